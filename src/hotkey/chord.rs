//! Modifier chord tracking
//!
//! The push-to-talk trigger is a set of modifier keys that must all be held
//! at once. Left and right variants of a modifier count as the same key, so
//! holding left-Ctrl plus right-Option engages a `ctrl+option` chord.
//!
//! [`ChordTracker`] is pure key bookkeeping: feed it every modifier press
//! and release and it reports the engage/release transitions. It emits one
//! [`ChordTransition::Engaged`] per engagement, so a chord cannot re-fire
//! without a full release first.

use crate::error::HotkeyError;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A logical modifier key (left/right variants folded together)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Control,
    Option,
    Shift,
    Command,
    Function,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Control => "ctrl",
            Modifier::Option => "option",
            Modifier::Shift => "shift",
            Modifier::Command => "cmd",
            Modifier::Function => "fn",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Modifier {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ctrl" | "control" => Ok(Modifier::Control),
            "option" | "opt" | "alt" => Ok(Modifier::Option),
            "shift" => Ok(Modifier::Shift),
            "cmd" | "command" | "meta" => Ok(Modifier::Command),
            "fn" | "function" | "globe" => Ok(Modifier::Function),
            other => Err(HotkeyError::UnknownModifier(other.to_string())),
        }
    }
}

/// Parse a chord spec like `"ctrl+option"` into its modifiers
pub fn parse_chord(spec: &str) -> Result<Vec<Modifier>, HotkeyError> {
    let mut chord = Vec::new();
    for part in spec.split('+') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let modifier = part.parse()?;
        if !chord.contains(&modifier) {
            chord.push(modifier);
        }
    }
    if chord.is_empty() {
        return Err(HotkeyError::EmptyChord);
    }
    Ok(chord)
}

/// Chord state transition produced by a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordTransition {
    /// Every required modifier is now held
    Engaged,
    /// A required modifier was let go while engaged
    Released,
}

/// Tracks held modifiers and detects chord engage/release transitions
#[derive(Debug)]
pub struct ChordTracker {
    required: Vec<Modifier>,
    held: HashSet<Modifier>,
    engaged: bool,
}

impl ChordTracker {
    pub fn new(required: Vec<Modifier>) -> Self {
        Self {
            required,
            held: HashSet::new(),
            engaged: false,
        }
    }

    /// Record a modifier press. Returns `Engaged` when this press completes
    /// the chord and the chord was not already engaged.
    pub fn press(&mut self, modifier: Modifier) -> Option<ChordTransition> {
        self.held.insert(modifier);
        if !self.engaged && self.required.iter().all(|m| self.held.contains(m)) {
            self.engaged = true;
            return Some(ChordTransition::Engaged);
        }
        None
    }

    /// Record a modifier release. Returns `Released` when a required
    /// modifier drops out of an engaged chord.
    pub fn release(&mut self, modifier: Modifier) -> Option<ChordTransition> {
        self.held.remove(&modifier);
        if self.engaged && self.required.contains(&modifier) {
            self.engaged = false;
            return Some(ChordTransition::Released);
        }
        None
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_option() -> ChordTracker {
        ChordTracker::new(vec![Modifier::Control, Modifier::Option])
    }

    #[test]
    fn test_parse_chord() {
        assert_eq!(
            parse_chord("ctrl+option").unwrap(),
            vec![Modifier::Control, Modifier::Option]
        );
        assert_eq!(
            parse_chord("CMD + Shift").unwrap(),
            vec![Modifier::Command, Modifier::Shift]
        );
        // duplicates collapse
        assert_eq!(parse_chord("ctrl+control").unwrap(), vec![Modifier::Control]);
        assert!(parse_chord("").is_err());
        assert!(parse_chord("ctrl+banana").is_err());
    }

    #[test]
    fn test_engages_only_when_all_held() {
        let mut tracker = ctrl_option();
        assert_eq!(tracker.press(Modifier::Control), None);
        assert!(!tracker.is_engaged());
        assert_eq!(
            tracker.press(Modifier::Option),
            Some(ChordTransition::Engaged)
        );
        assert!(tracker.is_engaged());
    }

    #[test]
    fn test_single_engagement_per_hold() {
        let mut tracker = ctrl_option();
        tracker.press(Modifier::Control);
        tracker.press(Modifier::Option);
        // Key-repeat delivers more press events while held
        assert_eq!(tracker.press(Modifier::Control), None);
        assert_eq!(tracker.press(Modifier::Option), None);
        assert!(tracker.is_engaged());
    }

    #[test]
    fn test_releasing_any_required_key_releases_once() {
        let mut tracker = ctrl_option();
        tracker.press(Modifier::Control);
        tracker.press(Modifier::Option);

        assert_eq!(
            tracker.release(Modifier::Control),
            Some(ChordTransition::Released)
        );
        assert!(!tracker.is_engaged());
        // The other key going up afterwards is not a second release
        assert_eq!(tracker.release(Modifier::Option), None);
    }

    #[test]
    fn test_reengage_requires_repress() {
        let mut tracker = ctrl_option();
        tracker.press(Modifier::Control);
        tracker.press(Modifier::Option);
        tracker.release(Modifier::Option);

        // Control is still held; pressing Option again completes the chord
        assert_eq!(
            tracker.press(Modifier::Option),
            Some(ChordTransition::Engaged)
        );
    }

    #[test]
    fn test_unrelated_modifiers_do_not_trigger() {
        let mut tracker = ctrl_option();
        assert_eq!(tracker.press(Modifier::Shift), None);
        tracker.press(Modifier::Control);
        tracker.press(Modifier::Option);
        assert_eq!(tracker.release(Modifier::Shift), None);
        assert!(tracker.is_engaged());
    }

    #[test]
    fn test_release_without_engagement_is_silent() {
        let mut tracker = ctrl_option();
        assert_eq!(tracker.release(Modifier::Control), None);
        tracker.press(Modifier::Control);
        assert_eq!(tracker.release(Modifier::Control), None);
    }

    #[test]
    fn test_arbitrary_sequence_never_double_engages() {
        let mut tracker = ctrl_option();
        let mut engagements = 0;
        let sequence = [
            (Modifier::Control, true),
            (Modifier::Option, true),
            (Modifier::Option, true), // repeat
            (Modifier::Control, true),
            (Modifier::Shift, true),
            (Modifier::Option, false),
            (Modifier::Option, true),
            (Modifier::Control, false),
            (Modifier::Shift, false),
        ];
        let mut open = false;
        for (modifier, down) in sequence {
            let transition = if down {
                tracker.press(modifier)
            } else {
                tracker.release(modifier)
            };
            match transition {
                Some(ChordTransition::Engaged) => {
                    assert!(!open, "chord engaged while already engaged");
                    open = true;
                    engagements += 1;
                }
                Some(ChordTransition::Released) => {
                    assert!(open, "chord released while not engaged");
                    open = false;
                }
                None => {}
            }
        }
        assert_eq!(engagements, 2);
    }
}
