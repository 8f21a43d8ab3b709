//! Silence detection and speech segmentation.
//!
//! Classifies fixed-size audio frames as voiced or silent by RMS energy and
//! accumulates voiced runs into segments bounded by sustained silence.

use crate::audio::AudioBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Classifies frames as voiced or silent against a fixed energy threshold.
///
/// Pure function of the frame and the threshold: a frame whose RMS energy is
/// at or above the threshold is voiced, below it is silent.
#[derive(Debug, Clone, Copy)]
pub struct SilenceDetector {
    threshold: f32,
}

impl SilenceDetector {
    /// Create a detector with the given RMS threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Root-mean-square energy of a frame. Empty frames have zero energy.
    pub fn energy(frame: &[f32]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
    }

    /// True if the frame is voiced. The boundary is inclusive: a frame with
    /// energy exactly at the threshold counts as voiced.
    pub fn is_voiced(&self, frame: &[f32]) -> bool {
        Self::energy(frame) >= self.threshold
    }
}

/// Configuration for the segmenter state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// RMS energy below which a frame is classified as silence.
    pub silence_threshold: f32,
    /// Contiguous silent time (seconds) required to finalize a segment.
    pub silence_duration_secs: f32,
    /// Segments with less voiced audio than this (seconds) are discarded.
    pub min_segment_secs: f32,
    /// Frame length in milliseconds fed to the detector.
    pub frame_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.01,
            silence_duration_secs: 1.5,
            min_segment_secs: 0.3,
            frame_ms: 30,
        }
    }
}

impl SegmenterConfig {
    /// Frame length in samples at the given sample rate.
    pub fn frame_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as u64 * self.frame_ms as u64 / 1000) as usize
    }
}

/// Segmenter states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    /// No accumulated audio.
    Idle,
    /// Accumulating a voiced run.
    Recording,
}

/// State machine that accumulates voiced frames into segments.
///
/// Transitions:
/// - `Idle` to `Recording` on the first voiced frame.
/// - `Recording`: a voiced frame flushes any tolerated pause into the segment
///   and appends itself.
/// - `Recording`: silent frames are held back; once the held silence reaches
///   `silence_duration_secs` the segment is finalized without the trailing
///   silence and the machine returns to `Idle`.
///
/// A segment always contains at least one voiced frame; an all-silent stream
/// never produces one.
#[derive(Debug)]
pub struct Segmenter {
    detector: SilenceDetector,
    state: SegmentState,
    sample_rate: u32,
    segment: Vec<f32>,
    pending_silence: Vec<f32>,
    silence_samples: usize,
    min_segment_samples: usize,
}

impl Segmenter {
    /// Create a segmenter operating at the given sample rate.
    pub fn new(config: SegmenterConfig, sample_rate: u32) -> Self {
        Self {
            detector: SilenceDetector::new(config.silence_threshold),
            state: SegmentState::Idle,
            sample_rate,
            segment: Vec::new(),
            pending_silence: Vec::new(),
            silence_samples: (config.silence_duration_secs * sample_rate as f32) as usize,
            min_segment_samples: (config.min_segment_secs * sample_rate as f32) as usize,
        }
    }

    /// Feed one frame. Returns a finalized segment when a voiced run has been
    /// followed by sufficient silence.
    pub fn push_frame(&mut self, frame: &[f32]) -> Option<AudioBuffer> {
        let voiced = self.detector.is_voiced(frame);

        trace!(
            voiced = voiced,
            energy = SilenceDetector::energy(frame),
            recording = self.is_recording(),
            pending_silence = self.pending_silence.len(),
            "segmenter frame"
        );

        match self.state {
            SegmentState::Idle => {
                if voiced {
                    self.state = SegmentState::Recording;
                    self.segment.extend_from_slice(frame);
                    debug!("speech started");
                }
                None
            }
            SegmentState::Recording => {
                if voiced {
                    // Tolerated pause becomes part of the segment once speech resumes.
                    self.segment.append(&mut self.pending_silence);
                    self.segment.extend_from_slice(frame);
                    None
                } else {
                    self.pending_silence.extend_from_slice(frame);
                    if self.pending_silence.len() >= self.silence_samples {
                        self.finalize()
                    } else {
                        None
                    }
                }
            }
        }
    }

    /// True while a voiced run is being accumulated.
    pub fn is_recording(&self) -> bool {
        self.state == SegmentState::Recording
    }

    /// Discard any partial segment and return to `Idle`.
    pub fn reset(&mut self) {
        if !self.segment.is_empty() {
            debug!(samples = self.segment.len(), "discarding partial segment");
        }
        self.state = SegmentState::Idle;
        self.segment.clear();
        self.pending_silence.clear();
    }

    fn finalize(&mut self) -> Option<AudioBuffer> {
        self.state = SegmentState::Idle;
        self.pending_silence.clear();
        let samples = std::mem::take(&mut self.segment);

        if samples.len() < self.min_segment_samples {
            debug!(
                samples = samples.len(),
                min = self.min_segment_samples,
                "segment too short, discarding"
            );
            return None;
        }

        debug!(
            samples = samples.len(),
            duration_secs = samples.len() as f32 / self.sample_rate as f32,
            "speech ended, segment finalized"
        );
        Some(AudioBuffer::new(samples, self.sample_rate))
    }
}

#[cfg(test)]
#[path = "segment_test.rs"]
mod tests;
