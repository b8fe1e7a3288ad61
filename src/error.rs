//! Error types for voxbar
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the voxbar application
#[derive(Error, Debug)]
pub enum VoxbarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),

    #[error("Audio capture error: {0}")]
    Audio(#[from] AudioError),

    #[error("Transcription error: {0}")]
    Transcribe(#[from] TranscribeError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to hotkey detection
#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("Empty hotkey chord. Use modifier names joined by '+', e.g. 'ctrl+option'.")]
    EmptyChord,

    #[error("Unknown modifier: '{0}'. Valid names: ctrl, option, shift, cmd, fn.")]
    UnknownModifier(String),

    #[error("Failed to install the keyboard event tap: {0}")]
    TapFailed(String),

    #[error("Global hotkey capture is only supported on macOS")]
    Unsupported,
}

/// Errors related to audio capture
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio connection failed: {0}")]
    Connection(String),

    #[error("No audio input device found. Check your microphone.")]
    NoDevice,

    #[error("Audio capture timed out after {0} seconds")]
    Timeout(u32),

    #[error("No audio was captured. Check your microphone.")]
    EmptyRecording,

    #[error("Audio stream error: {0}")]
    StreamError(String),

    #[error("Microphone capture is only supported on macOS")]
    Unsupported,
}

/// Errors related to remote speech-to-text transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("No API key configured. Set it with: voxbar config set {0} <KEY>")]
    MissingApiKey(&'static str),

    #[error("Audio format error: {0}")]
    AudioFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Remote(String),
}

/// Errors related to text injection
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Text injection failed: {0}")]
    InjectionFailed(String),

    #[error("All output methods failed. Grant Accessibility permission in System Settings > Privacy & Security > Accessibility.")]
    AllMethodsFailed,
}

/// Result type alias using VoxbarError
pub type Result<T> = std::result::Result<T, VoxbarError>;
