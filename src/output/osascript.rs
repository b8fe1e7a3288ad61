//! macOS text output via osascript/AppleScript
//!
//! Uses System Events to simulate keystrokes. Fallback for setups where
//! CGEvent injection fails; requires the same Accessibility permission.

use super::TextOutput;
use crate::error::OutputError;
use std::process::Stdio;
use tokio::process::Command;

/// osascript-based text output
pub struct OsascriptOutput {
    /// Delay before typing starts, letting chord modifiers settle (ms)
    pre_type_delay_ms: u64,
}

impl OsascriptOutput {
    pub fn new(pre_type_delay_ms: u64) -> Self {
        Self { pre_type_delay_ms }
    }

    /// Escape text for an AppleScript string literal
    fn escape_for_applescript(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[async_trait::async_trait]
impl TextOutput for OsascriptOutput {
    async fn output(&self, text: &str) -> Result<(), OutputError> {
        if text.is_empty() {
            return Ok(());
        }

        // A still-held Option key would garble the keystrokes.
        if self.pre_type_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.pre_type_delay_ms)).await;
        }

        let escaped_text = Self::escape_for_applescript(text);
        let script = format!(
            r#"tell application "System Events" to keystroke "{}""#,
            escaped_text
        );

        let output = Command::new("osascript")
            .args(["-e", &script])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OutputError::InjectionFailed("osascript not found".to_string())
                } else {
                    OutputError::InjectionFailed(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not allowed") || stderr.contains("accessibility") {
                return Err(OutputError::InjectionFailed(
                    "Accessibility permission required. Grant access in System Settings > Privacy & Security > Accessibility".to_string()
                ));
            }
            return Err(OutputError::InjectionFailed(format!(
                "osascript failed: {}",
                stderr
            )));
        }

        tracing::info!("Text typed via osascript ({} chars)", text.len());
        Ok(())
    }

    async fn is_available(&self) -> bool {
        cfg!(target_os = "macos")
            && Command::new("which")
                .arg("osascript")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|s| s.success())
                .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "osascript (macOS)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_for_applescript() {
        assert_eq!(
            OsascriptOutput::escape_for_applescript(r#"hello "world""#),
            r#"hello \"world\""#
        );
        assert_eq!(
            OsascriptOutput::escape_for_applescript(r#"path\to\file"#),
            r#"path\\to\\file"#
        );
    }

    #[tokio::test]
    #[cfg(not(target_os = "macos"))]
    async fn test_unavailable_off_macos() {
        assert!(!OsascriptOutput::new(0).is_available().await);
    }
}
