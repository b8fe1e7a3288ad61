//! Remote speech-to-text transcription
//!
//! Two interchangeable providers:
//! - Groq: whisper-large-v3 behind an OpenAI-compatible transcriptions
//!   endpoint (multipart WAV upload)
//! - Gemini: generateContent with the WAV bytes inlined as base64
//!
//! Both clients are blocking (ureq); the daemon calls them through
//! `spawn_blocking` so the hotkey loop never waits on the network.

pub mod gemini;
pub mod groq;

use crate::config::{Config, Provider};
use crate::error::TranscribeError;
use std::io::Cursor;

/// Trait for speech-to-text implementations
pub trait Transcriber: Send + Sync {
    /// Transcribe audio samples to text.
    /// Input: f32 samples, mono, 16kHz.
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscribeError>;
}

/// Factory function to create the transcriber for the configured provider
pub fn create_transcriber(config: &Config) -> Result<Box<dyn Transcriber>, TranscribeError> {
    tracing::info!("Creating transcriber: provider={}", config.provider);

    let api_key = config
        .api_key_for(config.provider)
        .ok_or(TranscribeError::MissingApiKey(
            config.provider.api_key_name(),
        ))?
        .to_string();

    match config.provider {
        Provider::Groq => Ok(Box::new(groq::GroqTranscriber::new(api_key))),
        Provider::Gemini => Ok(Box::new(gemini::GeminiTranscriber::new(api_key))),
    }
}

/// Encode f32 samples to an in-memory 16-bit PCM WAV (mono, 16kHz)
pub fn encode_wav(samples: &[f32]) -> Result<Vec<u8>, TranscribeError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: crate::audio::SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut buffer, spec)
        .map_err(|e| TranscribeError::AudioFormat(format!("Failed to create WAV writer: {}", e)))?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let scaled = (clamped * i16::MAX as f32) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| TranscribeError::AudioFormat(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| TranscribeError::AudioFormat(format!("Failed to finalize WAV: {}", e)))?;

    Ok(buffer.into_inner())
}
