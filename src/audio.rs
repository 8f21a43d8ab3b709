//! Audio capture and processing.
//!
//! Handles microphone input capture, multi-channel to mono conversion, and
//! resampling of finished segments to the rate the recognition model expects.

use anyhow::{Context, Result};
use audioadapter_buffers::direct::SequentialSliceOfVecs;
use rubato::audioadapter::Adapter;
use rubato::{Fft, FixedSync, Resampler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use tracing::warn;

/// Audio buffer containing mono f32 samples at a known sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// True if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Convert multi-channel interleaved samples to mono by averaging all channels.
pub fn to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resampler for converting finished segments between sample rates.
///
/// Wraps a fixed-input-chunk FFT resampler; the tail of a segment is
/// zero-padded to a whole chunk and the filter delay is flushed and skipped,
/// so the output length matches `input_len * output_rate / input_rate`.
pub struct AudioResampler {
    resampler: Fft<f32>,
    input_rate: usize,
    output_rate: usize,
    chunk_size_in: usize,
}

impl AudioResampler {
    /// Create a new resampler.
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    /// * `chunk_size` - Number of input samples per processing chunk
    pub fn new(input_rate: u32, output_rate: u32, chunk_size: usize) -> Result<Self> {
        let resampler = Fft::new(
            input_rate as usize,
            output_rate as usize,
            chunk_size,
            1, // sub_chunks
            1, // channels
            FixedSync::Input,
        )
        .context("Failed to create resampler")?;

        Ok(Self {
            resampler,
            input_rate: input_rate as usize,
            output_rate: output_rate as usize,
            chunk_size_in: chunk_size,
        })
    }

    /// Resample a complete segment.
    ///
    /// Returns exactly `input.len() * output_rate / input_rate` samples. The
    /// resampler state is reset first, so segments are independent of each
    /// other.
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        self.resampler.reset();
        let expected = input.len() * self.output_rate / self.input_rate;
        let delay = self.resampler.output_delay();

        let mut collected = Vec::with_capacity(expected + delay + self.chunk_size_in);
        for chunk in input.chunks(self.chunk_size_in) {
            self.feed(chunk, &mut collected)?;
        }
        // Flush the filter delay with silence until the full signal has emerged.
        while collected.len() < delay + expected {
            self.feed(&[], &mut collected)?;
        }

        Ok(collected[delay..delay + expected].to_vec())
    }

    /// Feed one (possibly short) chunk, zero-padded to the fixed chunk size.
    fn feed(&mut self, chunk: &[f32], collected: &mut Vec<f32>) -> Result<()> {
        let mut buf = chunk.to_vec();
        buf.resize(self.chunk_size_in, 0.0);

        let input_vecs = vec![buf];
        let input_adapter = SequentialSliceOfVecs::new(&input_vecs, 1, self.chunk_size_in)
            .expect("chunk length matches adapter size");
        let resampled = self
            .resampler
            .process(&input_adapter, 0, None)
            .context("Resampling failed")?;

        for frame_idx in 0..resampled.frames() {
            collected.push(resampled.read_sample(0, frame_idx).unwrap_or(0.0));
        }
        Ok(())
    }

    /// Get the required input chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size_in
    }
}

/// Audio capture from the default input device.
///
/// The device callback pushes frames into a bounded queue. When the consumer
/// is stalled (a transcription call in flight) and the queue fills up, the
/// newest frames are dropped; the drop count is reported on the next drain.
pub struct AudioCapture {
    stream: cpal::Stream,
    receiver: mpsc::Receiver<Vec<f32>>,
    dropped: Arc<AtomicUsize>,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Start capturing audio from the default input device.
    ///
    /// # Arguments
    /// * `buffer_size` - Requested frames per device callback
    /// * `queue_frames` - Capacity of the callback-to-consumer queue
    pub fn start(buffer_size: u32, queue_frames: usize) -> Result<Self> {
        use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("No input device available")?;

        let config = device
            .default_input_config()
            .context("Failed to get default input config")?;

        let sample_rate = config.sample_rate();
        let channels = config.channels();
        let sample_format = config.sample_format();

        let mut stream_config: cpal::StreamConfig = config.into();
        stream_config.buffer_size = cpal::BufferSize::Fixed(buffer_size);

        let (sender, receiver) = mpsc::sync_channel(queue_frames);
        let dropped = Arc::new(AtomicUsize::new(0));

        let err_fn = |err| warn!(error = %err, "Audio stream error");

        // Overflow policy: drop newest. A full queue means the consumer is
        // blocked in a transcription call; audio arriving in that window is
        // discarded rather than unboundedly buffered.
        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                let drops = dropped.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _| {
                        if sender.try_send(data.to_vec()).is_err() {
                            drops.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let drops = dropped.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _| {
                        let samples: Vec<f32> = data.iter().map(|&s| s as f32 / 32768.0).collect();
                        if sender.try_send(samples).is_err() {
                            drops.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::U16 => {
                let drops = dropped.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _| {
                        let samples: Vec<f32> = data
                            .iter()
                            .map(|&s| (s as f32 - 32768.0) / 32768.0)
                            .collect();
                        if sender.try_send(samples).is_err() {
                            drops.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            format => anyhow::bail!("Unsupported sample format: {:?}", format),
        }
        .context("Failed to build input stream")?;

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            stream,
            receiver,
            dropped,
            sample_rate,
            channels,
        })
    }

    /// Get the native sample rate of the input device.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Try to receive available audio samples (non-blocking).
    /// Returns mono samples at the device's native sample rate.
    pub fn try_recv(&self) -> Option<Vec<f32>> {
        let mut all_samples = Vec::new();

        // Drain all available callbacks
        while let Ok(samples) = self.receiver.try_recv() {
            all_samples.extend(samples);
        }

        let dropped = self.dropped.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!(callbacks = dropped, "capture queue full, dropped newest audio");
        }

        if all_samples.is_empty() {
            return None;
        }

        Some(to_mono(&all_samples, self.channels))
    }

    /// Stop the audio stream and release the device.
    pub fn stop(self) {
        use cpal::traits::StreamTrait;
        let _ = self.stream.pause();
        drop(self);
    }
}

#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;
