//! macOS clipboard output via pbcopy
//!
//! Last resort when keystroke injection fails: the transcript lands on the
//! clipboard so the user can paste it manually.

use super::TextOutput;
use crate::error::OutputError;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// pbcopy-based clipboard output
pub struct PbcopyOutput;

impl PbcopyOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PbcopyOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextOutput for PbcopyOutput {
    async fn output(&self, text: &str) -> Result<(), OutputError> {
        if text.is_empty() {
            return Ok(());
        }

        let mut child = Command::new("pbcopy")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OutputError::InjectionFailed("pbcopy not found".to_string())
                } else {
                    OutputError::InjectionFailed(e.to_string())
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| OutputError::InjectionFailed(e.to_string()))?;
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| OutputError::InjectionFailed(e.to_string()))?;

        if !status.success() {
            return Err(OutputError::InjectionFailed(
                "pbcopy exited with error".to_string(),
            ));
        }

        tracing::info!("Text copied to clipboard via pbcopy ({} chars)", text.len());
        Ok(())
    }

    async fn is_available(&self) -> bool {
        cfg!(target_os = "macos")
            && Command::new("which")
                .arg("pbcopy")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|s| s.success())
                .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "clipboard (pbcopy)"
    }
}
