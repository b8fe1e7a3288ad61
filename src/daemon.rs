//! Daemon module - main event loop orchestration
//!
//! Coordinates the hotkey listener, audio capture, transcription, and text
//! output. The loop owns the session state machine:
//!
//! ```text
//! Idle --chord press--> Recording --chord release--> Transcribing --result--> Idle
//! ```
//!
//! A chord press only acts in `Idle`; presses during `Recording` or
//! `Transcribing` are ignored, so at most one recording is ever open. The
//! provider request runs in a spawned task and reports back over a channel,
//! which keeps the loop consuming hotkey events while a request is in
//! flight instead of queueing them.

use crate::audio::{self, AudioCapture, SAMPLE_RATE};
use crate::config::Config;
use crate::error::{AudioError, Result, TranscribeError};
use crate::hotkey::{self, HotkeyEvent};
use crate::notification;
use crate::output::{self, TextOutput};
use crate::state::State;
use crate::status::{StatusFile, StatusKind};
use crate::transcribe::{self, Transcriber};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Recordings shorter than this are treated as accidental presses
const MIN_RECORDING_SECS: f32 = 0.3;

/// Safety limit on a single recording
pub const MAX_RECORDING_SECS: u64 = 120;

/// Creates a fresh audio capture for each recording
pub type CaptureFactory =
    Box<dyn Fn() -> std::result::Result<Box<dyn AudioCapture>, AudioError> + Send>;

/// Main daemon that wires the real components into the event loop
pub struct Daemon {
    config: Config,
    status: StatusFile,
}

impl Daemon {
    /// Create a new daemon with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            status: StatusFile::at_default(),
        }
    }

    /// Run the daemon until interrupted
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting voxbar daemon");

        let chord = hotkey::parse_chord(&self.config.hotkey)?;
        tracing::info!(
            "Hold {} to dictate, release to transcribe (provider: {})",
            self.config.hotkey,
            self.config.provider
        );

        let transcriber: Arc<dyn Transcriber> =
            Arc::from(transcribe::create_transcriber(&self.config)?);
        let outputs = output::create_output_chain();
        tracing::debug!(
            "Output chain: {}",
            outputs
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        let hotkey_rx = hotkey::start_listener(chord)?;

        run_loop(
            hotkey_rx,
            Box::new(audio::create_capture),
            transcriber,
            outputs,
            self.status.clone(),
        )
        .await
    }
}

/// The daemon event loop, with every component injected.
///
/// Separate from [`Daemon::run`] so tests can drive it with a hand-held
/// hotkey channel and mock capture/transcriber/output. Returns when the
/// hotkey channel closes or on SIGINT/SIGTERM.
pub async fn run_loop(
    mut hotkey_rx: mpsc::Receiver<HotkeyEvent>,
    capture_factory: CaptureFactory,
    transcriber: Arc<dyn Transcriber>,
    outputs: Vec<Box<dyn TextOutput>>,
    status: StatusFile,
) -> Result<()> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    // Transcription tasks report back here; the loop keeps running while a
    // request is in flight.
    let (done_tx, mut done_rx) = mpsc::channel::<std::result::Result<String, TranscribeError>>(4);

    let mut state = State::Idle;
    let mut capture: Option<Box<dyn AudioCapture>> = None;

    status.write(StatusKind::Idle);

    loop {
        tokio::select! {
            event = hotkey_rx.recv() => {
                let Some(event) = event else {
                    tracing::debug!("Hotkey channel closed");
                    break;
                };

                match event {
                    HotkeyEvent::Pressed => {
                        if !state.is_idle() {
                            tracing::debug!("Chord press ignored while {}", state);
                            continue;
                        }

                        match capture_factory() {
                            Ok(mut new_capture) => match new_capture.start().await {
                                Ok(()) => {
                                    capture = Some(new_capture);
                                    state = State::Recording { started_at: Instant::now() };
                                    status.write(StatusKind::Recording);
                                    tracing::info!("Recording started");
                                }
                                Err(e) => {
                                    tracing::error!("Failed to start audio capture: {}", e);
                                    status.write(StatusKind::Error);
                                    notification::send(
                                        "Voxbar",
                                        &format!("Microphone unavailable: {}", e),
                                    )
                                    .await;
                                }
                            },
                            Err(e) => {
                                tracing::error!("Failed to create audio capture: {}", e);
                                status.write(StatusKind::Error);
                                notification::send(
                                    "Voxbar",
                                    &format!("Microphone unavailable: {}", e),
                                )
                                .await;
                            }
                        }
                    }

                    HotkeyEvent::Released => {
                        if !state.is_recording() {
                            tracing::trace!("Chord release ignored while {}", state);
                            continue;
                        }

                        let held = state.recording_duration().unwrap_or_default();
                        tracing::info!("Recording stopped ({:.1}s)", held.as_secs_f32());

                        let Some(mut active) = capture.take() else {
                            state = State::Idle;
                            status.write(StatusKind::Idle);
                            continue;
                        };

                        match active.stop().await {
                            Ok(samples) => {
                                let audio_secs = samples.len() as f32 / SAMPLE_RATE as f32;

                                if audio_secs < MIN_RECORDING_SECS {
                                    tracing::debug!(
                                        "Recording too short ({:.2}s), ignoring",
                                        audio_secs
                                    );
                                    state = State::Idle;
                                    status.write(StatusKind::Idle);
                                    continue;
                                }

                                tracing::info!("Transcribing {:.1}s of audio...", audio_secs);
                                state = State::Transcribing { started_at: Instant::now() };
                                status.write(StatusKind::Transcribing);

                                let task_transcriber = Arc::clone(&transcriber);
                                let task_done = done_tx.clone();
                                tokio::spawn(async move {
                                    let result = tokio::task::spawn_blocking(move || {
                                        task_transcriber.transcribe(&samples)
                                    })
                                    .await
                                    .unwrap_or_else(|e| {
                                        Err(TranscribeError::Remote(format!(
                                            "Transcription task failed: {}",
                                            e
                                        )))
                                    });
                                    let _ = task_done.send(result).await;
                                });
                            }
                            Err(e) => {
                                tracing::warn!("Recording error: {}", e);
                                state = State::Idle;
                                status.write(StatusKind::Idle);
                            }
                        }
                    }
                }
            }

            Some(result) = done_rx.recv() => {
                match result {
                    Ok(text) if text.is_empty() => {
                        tracing::debug!("Transcription was empty");
                        status.write(StatusKind::Idle);
                    }
                    Ok(text) => {
                        tracing::info!("Transcribed: {:?}", text);
                        match output::output_with_fallback(&outputs, &text).await {
                            Ok(()) => status.write(StatusKind::Idle),
                            Err(e) => {
                                tracing::error!("Output failed: {}", e);
                                status.write(StatusKind::Error);
                                notification::send(
                                    "Voxbar",
                                    &format!("Could not type the transcript: {}", e),
                                )
                                .await;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("Transcription failed: {}", e);
                        status.write(StatusKind::Error);
                        notification::send("Voxbar", &format!("Transcription failed: {}", e))
                            .await;
                    }
                }
                // No automatic retry; the next chord press starts fresh.
                state = State::Idle;
            }

            // Recording safety limit
            _ = tokio::time::sleep(Duration::from_millis(250)), if state.is_recording() => {
                if state
                    .recording_duration()
                    .is_some_and(|d| d.as_secs() >= MAX_RECORDING_SECS)
                {
                    tracing::warn!(
                        "Recording timeout ({}s limit), discarding",
                        MAX_RECORDING_SECS
                    );
                    if let Some(mut active) = capture.take() {
                        let _ = active.stop().await;
                    }
                    state = State::Idle;
                    status.write(StatusKind::Idle);
                }
            }

            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                break;
            }
        }
    }

    status.cleanup();
    tracing::info!("Daemon stopped");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
