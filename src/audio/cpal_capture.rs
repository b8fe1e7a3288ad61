//! cpal-based microphone capture
//!
//! Note: cpal::Stream is not Send, so the stream lives on a dedicated
//! thread and we communicate via channels. The callback downmixes to mono
//! and resamples to 16 kHz as chunks arrive, so `stop()` returns a buffer
//! that is ready to encode.

use super::{downmix_to_mono, resample_linear, AudioCapture, SAMPLE_RATE};
use crate::error::AudioError;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;

/// Commands sent to the audio capture thread
enum CaptureCommand {
    Stop(oneshot::Sender<Vec<f32>>),
}

/// cpal capture for the system default input device
pub struct CpalCapture {
    cmd_tx: Option<std::sync::mpsc::Sender<CaptureCommand>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl CpalCapture {
    pub fn new() -> Self {
        Self {
            cmd_tx: None,
            thread_handle: None,
        }
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&mut self) -> Result<(), AudioError> {
        use cpal::traits::{DeviceTrait, HostTrait};

        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        tracing::info!("Using audio device: {}", device_name);

        let supported_config = device
            .default_input_config()
            .map_err(|e| AudioError::Connection(e.to_string()))?;

        let source_rate = supported_config.sample_rate().0;
        let source_channels = supported_config.channels() as usize;
        let sample_format = supported_config.sample_format();

        tracing::debug!(
            "Device config: {} Hz, {} channel(s), format: {:?}",
            source_rate,
            source_channels,
            sample_format
        );

        let (cmd_tx, cmd_rx) = std::sync::mpsc::channel::<CaptureCommand>();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), AudioError>>();

        let samples = Arc::new(Mutex::new(Vec::<f32>::new()));

        let thread_handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                use cpal::traits::StreamTrait;

                let stream_config = cpal::StreamConfig {
                    channels: supported_config.channels(),
                    sample_rate: supported_config.sample_rate(),
                    buffer_size: cpal::BufferSize::Default,
                };

                let err_fn = |err| tracing::error!("Audio stream error: {}", err);

                let stream_result = match sample_format {
                    cpal::SampleFormat::F32 => build_stream::<f32>(
                        &device,
                        &stream_config,
                        samples.clone(),
                        source_rate,
                        source_channels,
                        err_fn,
                    ),
                    cpal::SampleFormat::I16 => build_stream::<i16>(
                        &device,
                        &stream_config,
                        samples.clone(),
                        source_rate,
                        source_channels,
                        err_fn,
                    ),
                    cpal::SampleFormat::U16 => build_stream::<u16>(
                        &device,
                        &stream_config,
                        samples.clone(),
                        source_rate,
                        source_channels,
                        err_fn,
                    ),
                    format => Err(AudioError::StreamError(format!(
                        "Unsupported sample format: {:?}",
                        format
                    ))),
                };

                let stream = match stream_result {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(AudioError::StreamError(e.to_string())));
                    return;
                }

                let _ = ready_tx.send(Ok(()));
                tracing::debug!("Audio capture thread started");

                if let Ok(CaptureCommand::Stop(response_tx)) = cmd_rx.recv() {
                    drop(stream);

                    let collected = {
                        let guard = samples.lock().unwrap();
                        guard.clone()
                    };

                    let _ = response_tx.send(collected);
                }

                tracing::debug!("Audio capture thread stopped");
            })
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        self.cmd_tx = Some(cmd_tx);
        self.thread_handle = Some(thread_handle);

        // Surface stream setup failures to the caller rather than logging
        // them from a thread nobody watches.
        match ready_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.cmd_tx = None;
                if let Some(handle) = self.thread_handle.take() {
                    let _ = handle.join();
                }
                Err(e)
            }
            Err(_) => Err(AudioError::StreamError(
                "Audio capture thread exited during setup".to_string(),
            )),
        }
    }

    async fn stop(&mut self) -> Result<Vec<f32>, AudioError> {
        let samples = if let Some(cmd_tx) = self.cmd_tx.take() {
            let (response_tx, response_rx) = oneshot::channel();

            if cmd_tx.send(CaptureCommand::Stop(response_tx)).is_ok() {
                match tokio::time::timeout(std::time::Duration::from_secs(2), response_rx).await {
                    Ok(Ok(samples)) => samples,
                    Ok(Err(_)) => {
                        return Err(AudioError::StreamError("Channel closed".to_string()))
                    }
                    Err(_) => return Err(AudioError::Timeout(2)),
                }
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        };

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }

        let duration_secs = samples.len() as f32 / SAMPLE_RATE as f32;
        tracing::debug!(
            "Audio capture stopped: {} samples ({:.2}s)",
            samples.len(),
            duration_secs
        );

        if samples.is_empty() {
            return Err(AudioError::EmptyRecording);
        }

        Ok(samples)
    }
}

/// Build an input stream for a specific sample type
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    source_rate: u32,
    source_channels: usize,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, AudioError>
where
    T: cpal::Sample + cpal::SizedSample + Send + 'static,
    f32: cpal::FromSample<T>,
{
    use cpal::traits::DeviceTrait;

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let as_f32: Vec<f32> = data
                    .iter()
                    .map(|&s| <f32 as cpal::FromSample<T>>::from_sample_(s))
                    .collect();

                let mono = downmix_to_mono(&as_f32, source_channels);

                let resampled = if source_rate != SAMPLE_RATE {
                    resample_linear(&mono, source_rate, SAMPLE_RATE)
                } else {
                    mono
                };

                if let Ok(mut guard) = samples.lock() {
                    guard.extend_from_slice(&resampled);
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| AudioError::StreamError(e.to_string()))?;

    Ok(stream)
}
