//! Groq speech-to-text client
//!
//! Groq serves Whisper behind an OpenAI-compatible API, so this is a
//! multipart WAV upload to `/v1/audio/transcriptions` with Bearer auth.

use super::{encode_wav, Transcriber};
use crate::error::TranscribeError;
use std::time::Duration;

/// Production endpoint base; tests point this at a local server
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai";

const MODEL: &str = "whisper-large-v3";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Groq transcription client
#[derive(Debug)]
pub struct GroqTranscriber {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GroqTranscriber {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            model: MODEL.to_string(),
            timeout: TIMEOUT,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.endpoint.trim_end_matches('/')
        )
    }

    /// Build the multipart form body for the API request
    fn build_multipart_body(&self, wav_data: &[u8]) -> (String, Vec<u8>) {
        let boundary = format!(
            "----VoxbarBoundary{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        let mut body = Vec::new();

        // file field
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"audio.wav\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
        body.extend_from_slice(wav_data);
        body.extend_from_slice(b"\r\n");

        // model field
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"model\"\r\n\r\n");
        body.extend_from_slice(self.model.as_bytes());
        body.extend_from_slice(b"\r\n");

        // response_format field
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"response_format\"\r\n\r\n");
        body.extend_from_slice(b"json\r\n");

        // end boundary
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        (boundary, body)
    }
}

impl Transcriber for GroqTranscriber {
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscribeError> {
        if samples.is_empty() {
            return Err(TranscribeError::AudioFormat("Empty audio buffer".into()));
        }

        let duration_secs = samples.len() as f32 / crate::audio::SAMPLE_RATE as f32;
        tracing::debug!(
            "Sending {:.2}s of audio to Groq ({} samples)",
            duration_secs,
            samples.len()
        );

        let start = std::time::Instant::now();

        let wav_data = encode_wav(samples)?;
        let (boundary, body) = self.build_multipart_body(&wav_data);

        let response = ureq::post(&self.url())
            .timeout(self.timeout)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_bytes(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let body = resp.into_string().unwrap_or_default();
                    TranscribeError::Remote(format!("Groq returned {}: {}", code, body))
                }
                ureq::Error::Transport(t) => {
                    TranscribeError::Network(format!("Request failed: {}", t))
                }
            })?;

        let json: serde_json::Value = response
            .into_json()
            .map_err(|e| TranscribeError::Remote(format!("Failed to parse response: {}", e)))?;

        let text = json
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                TranscribeError::Remote(format!("Response missing 'text' field: {}", json))
            })?
            .trim()
            .to_string();

        tracing::info!(
            "Groq transcription completed in {:.2}s ({} chars)",
            start.elapsed().as_secs_f32(),
            text.chars().count()
        );

        Ok(text)
    }
}
