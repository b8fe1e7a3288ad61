//! Status file for menu-bar integrations
//!
//! The daemon writes its current status (`idle`, `recording`,
//! `transcribing`, `error`) to a file under the runtime directory whenever
//! it changes. Menu-bar plugin hosts (SwiftBar, xbar) and `voxbar status`
//! read it; the `error` value stays in place until the next recording so a
//! failed transcription remains visible as a changed icon.

use std::path::{Path, PathBuf};

/// Status vocabulary written to the state file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Recording,
    Transcribing,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Idle => "idle",
            StatusKind::Recording => "recording",
            StatusKind::Transcribing => "transcribing",
            StatusKind::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime directory for ephemeral files
pub fn runtime_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("voxbar")
}

/// Default state file location
pub fn default_state_path() -> PathBuf {
    runtime_dir().join("state")
}

/// Handle to the daemon's state file
#[derive(Debug, Clone)]
pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default() -> Self {
        Self::new(default_state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current status; failures are logged, not fatal
    pub fn write(&self, kind: StatusKind) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create state file directory: {}", e);
                return;
            }
        }

        if let Err(e) = std::fs::write(&self.path, kind.as_str()) {
            tracing::warn!("Failed to write state file: {}", e);
        } else {
            tracing::trace!("State file updated: {}", kind);
        }
    }

    /// Remove the state file on shutdown
    pub fn cleanup(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("Failed to remove state file: {}", e);
            }
        }
    }
}

/// Read the current status from a state file ("stopped" when absent)
pub fn read_status(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "stopped".to_string())
}

/// Format a status value as menu-bar plugin JSON
pub fn format_status_json(status: &str) -> String {
    let (icon, tooltip) = match status {
        "idle" => ("🎙️", "Voxbar ready - hold the chord to dictate"),
        "recording" => ("🔴", "Recording..."),
        "transcribing" => ("⏳", "Transcribing..."),
        "error" => ("⚠️", "Last transcription failed"),
        "stopped" => ("", "Voxbar not running"),
        _ => ("?", "Unknown state"),
    };

    format!(
        r#"{{"text": "{}", "class": "{}", "tooltip": "{}"}}"#,
        icon, status, tooltip
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state");
        let status = StatusFile::new(path.clone());

        status.write(StatusKind::Recording);
        assert_eq!(read_status(&path), "recording");

        status.write(StatusKind::Error);
        assert_eq!(read_status(&path), "error");

        status.cleanup();
        assert!(!path.exists());
        assert_eq!(read_status(&path), "stopped");
    }

    #[test]
    fn test_status_kind_strings() {
        assert_eq!(StatusKind::Idle.as_str(), "idle");
        assert_eq!(StatusKind::Recording.as_str(), "recording");
        assert_eq!(StatusKind::Transcribing.as_str(), "transcribing");
        assert_eq!(StatusKind::Error.as_str(), "error");
    }

    #[test]
    fn test_format_status_json() {
        let json = format_status_json("recording");
        assert!(json.contains("🔴"));
        assert!(json.contains(r#""class": "recording""#));

        // valid JSON for every known state
        for status in ["idle", "recording", "transcribing", "error", "stopped", "?"] {
            let parsed: serde_json::Value =
                serde_json::from_str(&format_status_json(status)).unwrap();
            assert!(parsed.get("text").is_some());
        }
    }
}
