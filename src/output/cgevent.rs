//! macOS text output via CGEvent
//!
//! Synthesizes keyboard events through Core Graphics. Unicode string
//! injection works with any keyboard layout and supports all characters,
//! with no subprocess per transcript.
//!
//! Requires Accessibility permission:
//!   System Settings > Privacy & Security > Accessibility

use super::TextOutput;
use crate::error::OutputError;
use core_graphics::event::{CGEvent, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use std::time::Duration;

/// CGEvent-based text output
pub struct CgEventOutput {
    /// Delay before typing starts, letting chord modifiers settle (ms)
    pre_type_delay_ms: u64,
}

impl CgEventOutput {
    pub fn new(pre_type_delay_ms: u64) -> Self {
        Self { pre_type_delay_ms }
    }

    /// Check if Accessibility permission is granted
    fn check_accessibility_permission() -> bool {
        #[link(name = "ApplicationServices", kind = "framework")]
        extern "C" {
            fn AXIsProcessTrusted() -> bool;
        }
        unsafe { AXIsProcessTrusted() }
    }

    /// Type text using CGEvent (blocking, runs inside spawn_blocking)
    fn type_text_blocking(text: &str) -> Result<(), OutputError> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| OutputError::InjectionFailed("Failed to create CGEventSource".into()))?;

        // CGEvent unicode payloads are limited; send in small chunks.
        for chunk in text.chars().collect::<Vec<_>>().chunks(20) {
            Self::type_unicode_string(&source, chunk)?;
        }

        Ok(())
    }

    /// Inject a chunk of characters as a Unicode keyboard event
    fn type_unicode_string(source: &CGEventSource, chars: &[char]) -> Result<(), OutputError> {
        if chars.is_empty() {
            return Ok(());
        }

        let mut utf16_buf: Vec<u16> = Vec::with_capacity(chars.len() * 2);
        for ch in chars {
            let mut buf = [0u16; 2];
            let encoded = ch.encode_utf16(&mut buf);
            utf16_buf.extend_from_slice(encoded);
        }

        let event = CGEvent::new_keyboard_event(source.clone(), 0, true)
            .map_err(|_| OutputError::InjectionFailed("Failed to create keyboard event".into()))?;
        event.set_string_from_utf16_unchecked(&utf16_buf);
        event.post(CGEventTapLocation::HID);

        let event_up = CGEvent::new_keyboard_event(source.clone(), 0, false)
            .map_err(|_| OutputError::InjectionFailed("Failed to create key up event".into()))?;
        event_up.post(CGEventTapLocation::HID);

        Ok(())
    }
}

#[async_trait::async_trait]
impl TextOutput for CgEventOutput {
    async fn output(&self, text: &str) -> Result<(), OutputError> {
        if text.is_empty() {
            return Ok(());
        }

        if !Self::check_accessibility_permission() {
            return Err(OutputError::InjectionFailed(
                "Accessibility permission required.\n\
                 Grant access in: System Settings > Privacy & Security > Accessibility\n\
                 Then restart voxbar."
                    .into(),
            ));
        }

        if self.pre_type_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.pre_type_delay_ms)).await;
        }

        tracing::debug!("cgevent: typing {} chars", text.chars().count());

        // CGEventSource is not Send, so all CGEvent work happens in
        // spawn_blocking.
        let text_owned = text.to_string();
        tokio::task::spawn_blocking(move || Self::type_text_blocking(&text_owned))
            .await
            .map_err(|e| OutputError::InjectionFailed(format!("Task join error: {}", e)))??;

        tracing::info!("Text typed via CGEvent ({} chars)", text.chars().count());
        Ok(())
    }

    async fn is_available(&self) -> bool {
        // Always claim availability so a denied permission produces the
        // helpful error above instead of a silent skip.
        true
    }

    fn name(&self) -> &'static str {
        "cgevent (macOS native)"
    }
}
