//! Configuration loading and persistence for voxbar
//!
//! The configuration lives in a plain `key=value` file at `~/.voxbar_config`
//! so menu-bar plugin scripts can read and edit it without a parser:
//!
//! ```text
//! provider=groq
//! groq_api_key=gsk_...
//! google_api_key=AIza...
//! hotkey=ctrl+option
//! ```
//!
//! Missing API keys fall back to the `GROQ_API_KEY` / `GOOGLE_API_KEY`
//! environment variables. The file is only rewritten through an explicit
//! `voxbar config set` action.

use crate::error::VoxbarError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default push-to-talk chord
pub const DEFAULT_HOTKEY: &str = "ctrl+option";

/// Remote speech-to-text provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Groq whisper-large-v3 (OpenAI-compatible endpoint)
    #[default]
    Groq,
    /// Google Gemini (generateContent with inline audio)
    Gemini,
}

impl Provider {
    /// Config key holding this provider's API key
    pub fn api_key_name(&self) -> &'static str {
        match self {
            Provider::Groq => "groq_api_key",
            Provider::Gemini => "google_api_key",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Groq => write!(f, "groq"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for Provider {
    type Err = VoxbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            // "google" kept as an alias since the API key is a Google one
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(VoxbarError::Config(format!(
                "unknown provider '{}' (expected 'groq' or 'gemini')",
                other
            ))),
        }
    }
}

/// Persisted application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Active transcription provider
    pub provider: Provider,

    /// Groq API key, if configured
    pub groq_api_key: Option<String>,

    /// Google API key, if configured
    pub google_api_key: Option<String>,

    /// Push-to-talk chord, modifier names joined by '+'
    pub hotkey: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::Groq,
            groq_api_key: None,
            google_api_key: None,
            hotkey: DEFAULT_HOTKEY.to_string(),
        }
    }
}

impl Config {
    /// Default config file path (`~/.voxbar_config`)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voxbar_config")
    }

    /// Load configuration from `path`, with defaults for a missing file and
    /// environment fallbacks for absent API keys.
    pub fn load(path: &Path) -> Result<Self, VoxbarError> {
        let mut config = if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| VoxbarError::Config(format!("Failed to read config: {}", e)))?;
            Self::parse(&contents)?
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        if config.groq_api_key.is_none() {
            config.groq_api_key = non_empty(std::env::var("GROQ_API_KEY").ok());
        }
        if config.google_api_key.is_none() {
            config.google_api_key = non_empty(std::env::var("GOOGLE_API_KEY").ok());
        }

        Ok(config)
    }

    /// Parse `key=value` config file contents
    pub fn parse(contents: &str) -> Result<Self, VoxbarError> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!("Ignoring malformed config line: {:?}", line);
                continue;
            };

            let value = value.trim();
            match key.trim() {
                "provider" => config.provider = value.parse()?,
                "groq_api_key" => config.groq_api_key = non_empty(Some(value.to_string())),
                "google_api_key" => config.google_api_key = non_empty(Some(value.to_string())),
                "hotkey" => {
                    if !value.is_empty() {
                        config.hotkey = value.to_string();
                    }
                }
                other => tracing::warn!("Ignoring unknown config key: {:?}", other),
            }
        }

        Ok(config)
    }

    /// Write the configuration back to `path`
    pub fn save(&self, path: &Path) -> Result<(), VoxbarError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VoxbarError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let mut contents = String::new();
        contents.push_str(&format!("provider={}\n", self.provider));
        if let Some(ref key) = self.groq_api_key {
            contents.push_str(&format!("groq_api_key={}\n", key));
        }
        if let Some(ref key) = self.google_api_key {
            contents.push_str(&format!("google_api_key={}\n", key));
        }
        contents.push_str(&format!("hotkey={}\n", self.hotkey));

        std::fs::write(path, contents)
            .map_err(|e| VoxbarError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Apply a single `voxbar config set <key> <value>` update
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), VoxbarError> {
        match key {
            "provider" => self.provider = value.parse()?,
            "groq_api_key" => self.groq_api_key = non_empty(Some(value.to_string())),
            "google_api_key" => self.google_api_key = non_empty(Some(value.to_string())),
            "hotkey" => {
                crate::hotkey::parse_chord(value)?;
                self.hotkey = value.to_string();
            }
            other => {
                return Err(VoxbarError::Config(format!(
                    "unknown config key '{}' (expected provider, groq_api_key, google_api_key, or hotkey)",
                    other
                )))
            }
        }
        Ok(())
    }

    /// API key for the given provider, if configured
    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Groq => self.groq_api_key.as_deref(),
            Provider::Gemini => self.google_api_key.as_deref(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider, Provider::Groq);
        assert!(config.groq_api_key.is_none());
        assert!(config.google_api_key.is_none());
        assert_eq!(config.hotkey, "ctrl+option");
    }

    #[test]
    fn test_parse_full_file() {
        let contents = "\
provider=gemini
groq_api_key=gsk_test123
google_api_key=AIzaTest
hotkey=ctrl+shift
";
        let config = Config::parse(contents).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_test123"));
        assert_eq!(config.google_api_key.as_deref(), Some("AIzaTest"));
        assert_eq!(config.hotkey, "ctrl+shift");
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let contents = "\
# voxbar configuration

provider=groq

# key follows
groq_api_key=gsk_abc
";
        let config = Config::parse(contents).unwrap();
        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_abc"));
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let config = Config::parse("provider=groq\nfont_size=12\n").unwrap();
        assert_eq!(config.provider, Provider::Groq);
    }

    #[test]
    fn test_parse_empty_value_means_unset() {
        let config = Config::parse("groq_api_key=\n").unwrap();
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_provider() {
        let err = Config::parse("provider=whisperfarm\n").unwrap_err();
        assert!(err.to_string().contains("whisperfarm"));
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("GROQ".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        let mut config = Config::default();
        config.provider = Provider::Gemini;
        config.google_api_key = Some("AIzaRoundTrip".to_string());
        config.save(&path).unwrap();

        let loaded = Config::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.provider, Provider::Gemini);
        assert_eq!(loaded.google_api_key.as_deref(), Some("AIzaRoundTrip"));
        assert_eq!(loaded.hotkey, DEFAULT_HOTKEY);
    }

    #[test]
    fn test_set_provider_and_keys() {
        let mut config = Config::default();
        config.set("provider", "gemini").unwrap();
        assert_eq!(config.provider, Provider::Gemini);

        config.set("groq_api_key", "gsk_new").unwrap();
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_new"));

        assert!(config.set("volume", "11").is_err());
    }

    #[test]
    fn test_set_hotkey_validates_chord() {
        let mut config = Config::default();
        config.set("hotkey", "cmd+shift").unwrap();
        assert_eq!(config.hotkey, "cmd+shift");

        assert!(config.set("hotkey", "ctrl+banana").is_err());
        assert_eq!(config.hotkey, "cmd+shift");
    }

    #[test]
    fn test_api_key_for() {
        let config = Config {
            provider: Provider::Groq,
            groq_api_key: Some("gsk_x".to_string()),
            google_api_key: None,
            hotkey: DEFAULT_HOTKEY.to_string(),
        };
        assert_eq!(config.api_key_for(Provider::Groq), Some("gsk_x"));
        assert_eq!(config.api_key_for(Provider::Gemini), None);
    }
}
