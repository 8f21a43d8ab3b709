//! Whisper transcription backend.
//!
//! Uses whisper.cpp via whisper-rs for speech-to-text.

use super::{Transcriber, WHISPER_SAMPLE_RATE};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

/// Whisper speech-to-text transcriber.
///
/// The underlying WhisperContext is leaked intentionally: the model stays
/// loaded for the process lifetime, which avoids self-referential struct
/// patterns while letting the state be reused across segments.
pub struct WhisperTranscriber {
    state: WhisperState,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Load a Whisper model and prepare a reusable inference state.
    ///
    /// # Arguments
    /// * `model_path` - Path to the Whisper GGML model file
    /// * `language` - Language code (e.g., "en", "de") or None for auto-detect
    pub fn new(model_path: impl AsRef<Path>, language: Option<String>) -> Result<Self> {
        info!(
            path = %model_path.as_ref().display(),
            language = ?language,
            "Loading Whisper model"
        );

        let ctx = WhisperContext::new_with_params(
            model_path.as_ref().to_str().context("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .context("Failed to load Whisper model")?;

        // Leak the context to get a 'static reference; the model lives for
        // the whole process anyway.
        let ctx_ref: &'static WhisperContext = Box::leak(Box::new(ctx));

        let state = ctx_ref
            .create_state()
            .context("Failed to create Whisper state")?;

        info!("Whisper model loaded");

        Ok(Self { state, language })
    }

    /// Get the configured language, if fixed.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

fn build_params(language: Option<&str>) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

    // None means auto-detect.
    params.set_language(language);

    // Keep whisper.cpp quiet on stdout; transcripts go to the output sink.
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    // Segments are short utterances; single-segment mode keeps latency down.
    params.set_single_segment(true);

    params
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&mut self, audio: &[f32], sample_rate: u32) -> Result<String> {
        if sample_rate != WHISPER_SAMPLE_RATE {
            anyhow::bail!(
                "Whisper expects {}Hz audio, got {}Hz. Resample before calling transcribe.",
                WHISPER_SAMPLE_RATE,
                sample_rate
            );
        }

        debug!(
            samples = audio.len(),
            duration_secs = audio.len() as f32 / sample_rate as f32,
            "Transcribing segment"
        );

        let params = build_params(self.language.as_deref());
        self.state
            .full(params, audio)
            .context("Whisper inference failed")?;

        let num_segments = self.state.full_n_segments();
        let mut result = String::new();

        for i in 0..num_segments {
            if let Some(segment) = self.state.get_segment(i)
                && let Ok(text) = segment.to_str_lossy()
            {
                result.push_str(&text);
            }
        }

        debug!(text_len = result.len(), "Transcription complete");

        Ok(result.trim().to_string())
    }
}
