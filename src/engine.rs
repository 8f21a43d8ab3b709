//! Transcription engine that coordinates the audio pipeline.
//!
//! The engine owns and orchestrates:
//! - Audio capture from the microphone
//! - Silence-based segmentation at the device sample rate
//! - Resampling of finished segments to 16kHz
//! - Speech-to-text transcription

use crate::audio::{AudioCapture, AudioResampler};
use crate::config::Config;
use crate::models::ModelManager;
use crate::segment::Segmenter;
use crate::transcribe::{Transcriber, WHISPER_SAMPLE_RATE, WhisperTranscriber};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Input samples per resampler chunk.
const RESAMPLER_CHUNK: usize = 1024;

/// Transcription engine.
pub struct Engine {
    config: Config,
    model_manager: ModelManager,
    transcriber: Option<WhisperTranscriber>,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let model_manager = ModelManager::new()?;
        Ok(Self {
            config,
            model_manager,
            transcriber: None,
        })
    }

    /// Create a new engine with a custom model manager.
    pub fn with_model_manager(config: Config, model_manager: ModelManager) -> Self {
        Self {
            config,
            model_manager,
            transcriber: None,
        }
    }

    /// Check if the engine has been initialized (model loaded).
    pub fn is_initialized(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Initialize the engine: download the model if needed and load it.
    ///
    /// `on_progress` receives (downloaded, total) bytes while a download is
    /// in flight. After this returns Ok(()), the engine is ready for
    /// `run_loop()`.
    pub async fn initialize(&mut self, on_progress: impl Fn(u64, u64) + Send) -> Result<()> {
        info!(model = ?self.config.model.size, "Initializing engine");

        let model_path = self
            .model_manager
            .ensure_model(self.config.model.size, on_progress)
            .await
            .context("Failed to ensure Whisper model")?;

        let language = if self.config.model.language == "auto" {
            None
        } else {
            Some(self.config.model.language.clone())
        };
        let transcriber = WhisperTranscriber::new(&model_path, language)
            .context("Failed to initialize Whisper")?;

        self.transcriber = Some(transcriber);
        info!("Engine initialized");

        Ok(())
    }

    /// Run the capture, segmentation, and transcription loop.
    ///
    /// Blocks until the `cancel` token is cancelled, then stops the audio
    /// stream and releases the device. A partial segment in progress at
    /// cancellation is discarded, not transcribed.
    /// Requires `initialize()` to have been called first.
    pub async fn run_loop(
        &mut self,
        cancel: CancellationToken,
        mut on_text: impl FnMut(&str),
    ) -> Result<()> {
        let audio_config = self.config.audio.clone();
        let segmenter_config = self.config.segmenter;
        let transcriber = self
            .transcriber
            .as_mut()
            .context("Engine not initialized — call initialize() first")?;

        info!("Starting audio capture");

        let capture = AudioCapture::start(audio_config.buffer_size, audio_config.queue_frames)
            .context("Failed to start audio capture")?;
        let sample_rate = capture.sample_rate();
        info!(
            sample_rate = sample_rate,
            target_rate = WHISPER_SAMPLE_RATE,
            "Audio capture started"
        );

        let mut resampler = AudioResampler::new(sample_rate, WHISPER_SAMPLE_RATE, RESAMPLER_CHUNK)
            .context("Failed to create resampler")?;

        let mut segmenter = Segmenter::new(segmenter_config, sample_rate);
        let frame_samples = segmenter_config.frame_samples(sample_rate);
        let mut input_buffer: Vec<f32> = Vec::new();

        info!("Listening for speech...");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Cancellation received, stopping audio capture");
                    break;
                }
                _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {
                    if let Some(samples) = capture.try_recv() {
                        input_buffer.extend(samples);
                    }

                    // Feed complete detector frames
                    while input_buffer.len() >= frame_samples {
                        let frame: Vec<f32> = input_buffer.drain(..frame_samples).collect();

                        let Some(segment) = segmenter.push_frame(&frame) else {
                            continue;
                        };

                        let resampled = match resampler.resample(&segment.samples) {
                            Ok(resampled) => resampled,
                            Err(e) => {
                                error!(error = %e, "Resampling failed, dropping segment");
                                continue;
                            }
                        };
                        if resampled.is_empty() {
                            continue;
                        }

                        debug!(
                            duration_secs = segment.duration_secs(),
                            resampled_samples = resampled.len(),
                            "Transcribing segment"
                        );

                        // Blocking call; audio arriving meanwhile queues in the
                        // bounded capture channel (newest dropped on overflow).
                        match transcriber.transcribe(&resampled, WHISPER_SAMPLE_RATE) {
                            Ok(text) => {
                                if !text.is_empty() {
                                    info!(text = %text, "Transcription complete");
                                    on_text(&text);
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "Transcription failed");
                            }
                        }
                    }
                }
            }
        }

        // Interrupt during an active recording discards the partial segment.
        segmenter.reset();
        capture.stop();
        info!("Audio capture stopped");

        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
