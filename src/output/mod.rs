//! Text output module
//!
//! Types the transcript at the cursor position, falling back through:
//! 1. CGEvent Unicode injection - native, any keyboard layout (macOS)
//! 2. osascript System Events keystroke - works without linking frameworks
//! 3. pbcopy - clipboard as last resort
//!
//! All methods wait briefly before typing so the released chord modifiers
//! (Ctrl/Option still going up) cannot corrupt the synthesized keystrokes.

#[cfg(target_os = "macos")]
pub mod cgevent;
pub mod osascript;
pub mod pbcopy;

use crate::error::OutputError;

/// Grace period for the chord's modifier keys to settle before typing
pub const MODIFIER_SETTLE_MS: u64 = 200;

/// Trait for text output implementations
#[async_trait::async_trait]
pub trait TextOutput: Send + Sync {
    /// Output text (type it or copy to clipboard)
    async fn output(&self, text: &str) -> Result<(), OutputError>;

    /// Check if this output method is available
    async fn is_available(&self) -> bool;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Factory function that returns the injection fallback chain
pub fn create_output_chain() -> Vec<Box<dyn TextOutput>> {
    let mut chain: Vec<Box<dyn TextOutput>> = Vec::new();

    #[cfg(target_os = "macos")]
    chain.push(Box::new(cgevent::CgEventOutput::new(MODIFIER_SETTLE_MS)));

    chain.push(Box::new(osascript::OsascriptOutput::new(MODIFIER_SETTLE_MS)));
    chain.push(Box::new(pbcopy::PbcopyOutput::new()));

    chain
}

/// Try each output method in the chain until one succeeds
pub async fn output_with_fallback(
    chain: &[Box<dyn TextOutput>],
    text: &str,
) -> Result<(), OutputError> {
    for output in chain {
        if !output.is_available().await {
            tracing::debug!("{} not available, trying next", output.name());
            continue;
        }

        match output.output(text).await {
            Ok(()) => {
                tracing::debug!("Text output via {}", output.name());
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("{} failed: {}, trying next", output.name(), e);
            }
        }
    }

    Err(OutputError::AllMethodsFailed)
}
