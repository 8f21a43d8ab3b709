//! Speech-to-text transcription.
//!
//! This module provides a trait abstraction for transcription backends
//! and the Whisper implementation used by the pipeline.

use anyhow::Result;

mod whisper;

pub use whisper::WhisperTranscriber;

/// Sample rate required by the recognition model.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Speech-to-text transcriber.
///
/// Implementations convert audio samples to text. Calls may take seconds and
/// are treated as blocking by the pipeline.
pub trait Transcriber: Send {
    /// Transcribe audio samples to text.
    ///
    /// # Arguments
    /// * `audio` - Mono f32 samples
    /// * `sample_rate` - Sample rate of the audio in Hz (must be 16000)
    ///
    /// # Returns
    /// The transcribed text, or an error if transcription failed.
    fn transcribe(&mut self, audio: &[f32], sample_rate: u32) -> Result<String>;
}
