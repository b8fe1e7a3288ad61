//! Audio capture module
//!
//! Records microphone audio via cpal (CoreAudio on macOS). Captured audio
//! is downmixed to mono and resampled to 16 kHz, the format both providers
//! accept as WAV.

#[cfg(target_os = "macos")]
pub mod cpal_capture;

use crate::error::AudioError;

/// Sample rate of all captured and transmitted audio
pub const SAMPLE_RATE: u32 = 16_000;

/// Trait for audio capture implementations
///
/// One capture instance corresponds to one recording: `start()` opens the
/// input stream, `stop()` tears it down and yields everything captured.
#[async_trait::async_trait]
pub trait AudioCapture: Send {
    /// Open the input stream and begin buffering samples
    async fn start(&mut self) -> Result<(), AudioError>;

    /// Stop capturing and return all recorded samples (f32, mono, 16kHz)
    async fn stop(&mut self) -> Result<Vec<f32>, AudioError>;
}

/// Factory function to create audio capture for the default input device
#[cfg(target_os = "macos")]
pub fn create_capture() -> Result<Box<dyn AudioCapture>, AudioError> {
    Ok(Box::new(cpal_capture::CpalCapture::new()))
}

#[cfg(not(target_os = "macos"))]
pub fn create_capture() -> Result<Box<dyn AudioCapture>, AudioError> {
    Err(AudioError::Unsupported)
}

/// Average interleaved frames down to a single channel
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear interpolation resampling
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_idx = i as f64 / ratio;
        let idx = src_idx.floor() as usize;
        let frac = (src_idx - idx as f64) as f32;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        } else {
            samples.get(idx).copied().unwrap_or(0.0)
        };

        output.push(sample);
    }

    output
}
