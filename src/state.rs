//! State machine for the voxbar daemon
//!
//! Defines the states for the push-to-talk workflow:
//! Idle → Recording → Transcribing → Idle

use std::time::Instant;

/// Session state
///
/// At most one recording is open at any time: a chord press only acts in
/// `Idle`, and a press during `Recording` or `Transcribing` is ignored.
#[derive(Debug, Clone)]
pub enum State {
    /// Waiting for the chord to be pressed
    Idle,

    /// Chord held, recording audio
    Recording {
        /// When recording started
        started_at: Instant,
    },

    /// Chord released, provider request in flight
    Transcribing {
        /// When the request was submitted
        started_at: Instant,
    },
}

impl State {
    /// Create a new idle state
    pub fn new() -> Self {
        State::Idle
    }

    /// Check if in idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Check if in recording state
    pub fn is_recording(&self) -> bool {
        matches!(self, State::Recording { .. })
    }

    /// Check if a provider request is in flight
    pub fn is_transcribing(&self) -> bool {
        matches!(self, State::Transcribing { .. })
    }

    /// Get recording duration if currently recording
    pub fn recording_duration(&self) -> Option<std::time::Duration> {
        match self {
            State::Recording { started_at } => Some(started_at.elapsed()),
            _ => None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Recording { started_at } => {
                write!(f, "Recording ({:.1}s)", started_at.elapsed().as_secs_f32())
            }
            State::Transcribing { started_at } => {
                write!(
                    f,
                    "Transcribing ({:.1}s elapsed)",
                    started_at.elapsed().as_secs_f32()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = State::new();
        assert!(state.is_idle());
        assert!(!state.is_recording());
        assert!(!state.is_transcribing());
    }

    #[test]
    fn test_recording_state() {
        let state = State::Recording {
            started_at: Instant::now(),
        };
        assert!(state.is_recording());
        assert!(!state.is_idle());
        assert!(state.recording_duration().is_some());
    }

    #[test]
    fn test_transcribing_state() {
        let state = State::Transcribing {
            started_at: Instant::now(),
        };
        assert!(state.is_transcribing());
        assert!(!state.is_idle());
        assert!(!state.is_recording());
    }

    #[test]
    fn test_idle_has_no_duration() {
        let state = State::Idle;
        assert!(state.recording_duration().is_none());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", State::Idle), "Idle");

        let state = State::Recording {
            started_at: Instant::now(),
        };
        assert!(format!("{}", state).starts_with("Recording"));

        let state = State::Transcribing {
            started_at: Instant::now(),
        };
        assert!(format!("{}", state).starts_with("Transcribing"));
    }
}
