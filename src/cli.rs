// Command-line interface definitions for voxbar

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "voxbar")]
#[command(author, version, about = "Menu-bar push-to-talk dictation for macOS")]
#[command(long_about = "
Voxbar is a push-to-talk dictation tool for macOS.
Hold Ctrl+Option (configurable) to record, release to transcribe through
Groq or Google Gemini and type the text at the cursor position.

SETUP:
  1. Set an API key: voxbar config set groq_api_key <KEY>
     (or google_api_key, then: voxbar config set provider gemini)
  2. Run: voxbar (grant Accessibility permission when prompted)
  3. Hold Ctrl+Option while speaking, release to transcribe.

To keep the daemon alive across crashes, launch it through
scripts/voxbar-supervise.sh instead of directly.
")]
pub struct Cli {
    /// Path to config file (default: ~/.voxbar_config)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dictation daemon (default if no command specified)
    Daemon,

    /// Show or change the persisted configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show daemon status (for menu-bar plugin integration)
    Status {
        /// Output format: "text" (default) or "json" (for SwiftBar/xbar)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Transcribe an audio file (WAV) through the configured provider
    Transcribe {
        /// Path to audio file
        file: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Set a config value (provider, groq_api_key, google_api_key, hotkey)
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
}
