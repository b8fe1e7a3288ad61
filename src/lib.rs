//! Voxbar: menu-bar push-to-talk dictation for macOS
//!
//! This library provides the core functionality for:
//! - Detecting a global modifier chord via an rdev keyboard tap
//! - Capturing microphone audio via cpal (CoreAudio)
//! - Transcribing speech through a remote provider (Groq or Google Gemini)
//! - Typing the transcript at the cursor via CGEvent/osascript/pbcopy
//!
//! # Architecture
//!
//! ```text
//!                  ┌─────────────────────────────────────┐
//!                  │               Daemon                │
//!                  └─────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          │                         │                         │
//!          ▼                         ▼                         ▼
//! ┌──────────────┐          ┌──────────────┐          ┌──────────────┐
//! │    Hotkey    │          │    Audio     │          │    Status    │
//! │ (rdev chord) │          │    (cpal)    │          │ (state file) │
//! └──────────────┘          └──────────────┘          └──────────────┘
//!          │                         │
//!          │ chord press             │ audio samples
//!          │ chord release           │
//!          ▼                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Recording Flow                          │
//! │ [Press] ──▶ Start Recording ──▶ [Release] ──▶ Stop & Transcribe │
//! └─────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//!                           ┌──────────────┐
//!                           │  Transcribe  │
//!                           │ Groq/Gemini  │
//!                           └──────────────┘
//!                                    │
//!                                    ▼ text
//!                           ┌──────────────┐
//!                           │    Output    │
//!                           │cgevent/osa-  │
//!                           │script/pbcopy │
//!                           └──────────────┘
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod hotkey;
pub mod notification;
pub mod output;
pub mod state;
pub mod status;
pub mod transcribe;

pub use cli::{Cli, Commands, ConfigAction};
pub use config::{Config, Provider};
pub use daemon::Daemon;
pub use error::{Result, VoxbarError};
