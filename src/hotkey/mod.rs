//! Global hotkey detection
//!
//! The push-to-talk trigger is a modifier chord (default Ctrl+Option) held
//! anywhere in the system. On macOS the events come from an rdev keyboard
//! tap running on its own thread; [`chord::ChordTracker`] turns raw key
//! events into engage/release transitions.

pub mod chord;

#[cfg(target_os = "macos")]
mod macos;

pub use chord::{parse_chord, ChordTracker, ChordTransition, Modifier};

use crate::error::HotkeyError;
use tokio::sync::mpsc;

/// Hotkey events delivered to the daemon loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The full chord is held down
    Pressed,
    /// The chord was broken (any required modifier released)
    Released,
}

/// Start the global chord listener and return its event channel.
///
/// The listener runs on a dedicated OS thread for the lifetime of the
/// process; it only does key bookkeeping and never blocks on I/O.
#[cfg(target_os = "macos")]
pub fn start_listener(
    required: Vec<Modifier>,
) -> Result<mpsc::Receiver<HotkeyEvent>, HotkeyError> {
    macos::start(required)
}

#[cfg(not(target_os = "macos"))]
pub fn start_listener(
    _required: Vec<Modifier>,
) -> Result<mpsc::Receiver<HotkeyEvent>, HotkeyError> {
    Err(HotkeyError::Unsupported)
}
