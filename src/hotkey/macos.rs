//! macOS global chord listener using rdev
//!
//! Requires Accessibility permission. Without it rdev installs a dead event
//! tap that never fires; the daemon keeps running so the user can grant
//! permission and restart (the supervisor handles the restart).

use super::chord::{ChordTracker, ChordTransition, Modifier};
use super::HotkeyEvent;
use crate::error::HotkeyError;
use rdev::{listen, Event, EventType, Key};
use tokio::sync::mpsc;

/// Start the rdev keyboard tap on a dedicated thread
pub fn start(required: Vec<Modifier>) -> Result<mpsc::Receiver<HotkeyEvent>, HotkeyError> {
    // Triggers the system permission dialog on first run.
    if !check_accessibility_permission() {
        tracing::warn!(
            "Accessibility permission not granted. Grant access in: \
             System Settings > Privacy & Security > Accessibility, then restart voxbar."
        );
        crate::notification::send_sync(
            "Voxbar",
            "Accessibility permission required for the dictation hotkey. \
             Grant it in System Settings, then restart voxbar.",
        );
    }

    let (tx, rx) = mpsc::channel(32);

    std::thread::Builder::new()
        .name("hotkey-tap".to_string())
        .spawn(move || {
            let mut tracker = ChordTracker::new(required);

            let callback = move |event: Event| match event.event_type {
                EventType::KeyPress(key) => {
                    if let Some(modifier) = map_key(key) {
                        if tracker.press(modifier) == Some(ChordTransition::Engaged) {
                            let _ = tx.blocking_send(HotkeyEvent::Pressed);
                        }
                    }
                }
                EventType::KeyRelease(key) => {
                    if let Some(modifier) = map_key(key) {
                        if tracker.release(modifier) == Some(ChordTransition::Released) {
                            let _ = tx.blocking_send(HotkeyEvent::Released);
                        }
                    }
                }
                _ => {}
            };

            // Blocks for the lifetime of the process.
            if let Err(e) = listen(callback) {
                tracing::error!("rdev listen error: {:?}", e);
                tracing::warn!(
                    "Global chord capture failed. Grant Accessibility permission in \
                     System Settings > Privacy & Security > Accessibility."
                );
            }
        })
        .map_err(|e| HotkeyError::TapFailed(e.to_string()))?;

    Ok(rx)
}

/// Fold rdev's physical keys into logical modifiers
fn map_key(key: Key) -> Option<Modifier> {
    match key {
        Key::ControlLeft | Key::ControlRight => Some(Modifier::Control),
        Key::Alt | Key::AltGr => Some(Modifier::Option),
        Key::ShiftLeft | Key::ShiftRight => Some(Modifier::Shift),
        Key::MetaLeft | Key::MetaRight => Some(Modifier::Command),
        Key::Function => Some(Modifier::Function),
        _ => None,
    }
}

/// Check if Accessibility permission is granted, prompting the user if not.
///
/// Calls AXIsProcessTrustedWithOptions with kAXTrustedCheckOptionPrompt=true,
/// which makes macOS show the "App wants to control this computer" dialog
/// if permission hasn't been granted yet.
pub fn check_accessibility_permission() -> bool {
    #[link(name = "ApplicationServices", kind = "framework")]
    extern "C" {
        fn AXIsProcessTrustedWithOptions(options: core_foundation::base::CFTypeRef) -> bool;
    }

    use core_foundation::base::TCFType;
    use core_foundation::boolean::CFBoolean;
    use core_foundation::dictionary::CFDictionary;
    use core_foundation::string::CFString;

    let key = CFString::new("AXTrustedCheckOptionPrompt");
    let value = CFBoolean::true_value();
    let options = CFDictionary::from_CFType_pairs(&[(key.as_CFType(), value.as_CFType())]);

    unsafe { AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef() as _) }
}
