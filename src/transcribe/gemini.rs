//! Google Gemini speech-to-text client
//!
//! Gemini has no dedicated transcription endpoint; the WAV bytes go inline
//! (base64) into a `generateContent` request together with a transcription
//! prompt, and the transcript comes back as the candidate text.

use super::{encode_wav, Transcriber};
use crate::error::TranscribeError;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

/// Production endpoint base; tests point this at a local server
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

const MODEL: &str = "gemini-1.5-flash";
const TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT: &str = "Transcribe the audio faithfully. \
Fix punctuation. \
Do not add explanations. \
Return only the transcribed text.";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini transcription client
#[derive(Debug)]
pub struct GeminiTranscriber {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiTranscriber {
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
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Build the generateContent request body with inline WAV audio
    fn build_request_body(&self, wav_data: &[u8]) -> serde_json::Value {
        let audio_b64 = base64::engine::general_purpose::STANDARD.encode(wav_data);
        serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": PROMPT },
                    {
                        "inline_data": {
                            "mime_type": "audio/wav",
                            "data": audio_b64,
                        }
                    }
                ]
            }]
        })
    }
}

impl Transcriber for GeminiTranscriber {
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscribeError> {
        if samples.is_empty() {
            return Err(TranscribeError::AudioFormat("Empty audio buffer".into()));
        }

        let duration_secs = samples.len() as f32 / crate::audio::SAMPLE_RATE as f32;
        tracing::debug!(
            "Sending {:.2}s of audio to Gemini ({} samples)",
            duration_secs,
            samples.len()
        );

        let start = std::time::Instant::now();

        let wav_data = encode_wav(samples)?;
        let body = self.build_request_body(&wav_data);

        let response = ureq::post(&self.url())
            .timeout(self.timeout)
            .set("x-goog-api-key", &self.api_key)
            .send_json(body)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let body = resp.into_string().unwrap_or_default();
                    TranscribeError::Remote(format!("Gemini returned {}: {}", code, body))
                }
                ureq::Error::Transport(t) => {
                    TranscribeError::Network(format!("Request failed: {}", t))
                }
            })?;

        let parsed: GenerateContentResponse = response
            .into_json()
            .map_err(|e| TranscribeError::Remote(format!("Failed to parse response: {}", e)))?;

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            TranscribeError::Remote("Response contained no candidates".to_string())
        })?;

        let text = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        tracing::info!(
            "Gemini transcription completed in {:.2}s ({} chars)",
            start.elapsed().as_secs_f32(),
            text.chars().count()
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let t = GeminiTranscriber::new("AIzaTest".to_string());
        assert_eq!(
            t.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );

        let t = GeminiTranscriber::with_endpoint("AIzaTest".to_string(), "http://localhost:9090/");
        assert_eq!(
            t.url(),
            "http://localhost:9090/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let t = GeminiTranscriber::new("AIzaTest".to_string());
        let body = t.build_request_body(b"RIFFxxxx");

        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("Transcribe the audio"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "audio/wav");

        let data = parts[1]["inline_data"]["data"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(data)
            .unwrap();
        assert_eq!(decoded, b"RIFFxxxx");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "hello "}, {"text": "world"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn test_empty_audio_is_rejected_without_network() {
        let t = GeminiTranscriber::new("AIzaTest".to_string());
        let err = t.transcribe(&[]).unwrap_err();
        assert!(matches!(err, TranscribeError::AudioFormat(_)));
    }
}
