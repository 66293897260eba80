//! Decoded track buffer and segment ranges

use sc_common::decibels::{db_to_linear, linear_to_db, rms};
use serde::{Deserialize, Serialize};

/// Decoded audio track
///
/// Samples are interleaved f32, nominally in [-1.0, 1.0]. Gain can push
/// samples past full scale; they are clamped only when encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

/// Contiguous millisecond range of a track kept after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Start offset in milliseconds (inclusive)
    pub start_ms: u64,
    /// End offset in milliseconds (exclusive)
    pub end_ms: u64,
}

impl Segment {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl Track {
    /// Create track from interleaved samples
    ///
    /// A channel count of zero is treated as mono. Trailing samples that do
    /// not form a whole frame are dropped.
    pub fn new(mut samples: Vec<f32>, channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let whole_frames = samples.len() / channels;
        samples.truncate(whole_frames * channels);

        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Track length in milliseconds, rounded to the nearest millisecond
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        let frames = self.frame_count() as f64;
        (frames * 1000.0 / f64::from(self.sample_rate)).round() as u64
    }

    /// Frame index for a millisecond offset, clamped to the track length
    pub fn ms_to_frame(&self, ms: u64) -> usize {
        let frame = ms.saturating_mul(u64::from(self.sample_rate)) / 1000;
        (frame as usize).min(self.frame_count())
    }

    /// Interleaved samples between two millisecond offsets
    pub fn window(&self, start_ms: u64, end_ms: u64) -> &[f32] {
        let start = self.ms_to_frame(start_ms) * self.channels;
        let end = self.ms_to_frame(end_ms).max(self.ms_to_frame(start_ms)) * self.channels;
        &self.samples[start..end]
    }

    /// RMS loudness in dBFS over all samples
    ///
    /// Digital silence (and an empty track) measures `-inf`.
    pub fn loudness_dbfs(&self) -> f64 {
        linear_to_db(rms(&self.samples))
    }

    /// Apply uniform gain in dB to every sample
    pub fn apply_gain(mut self, gain_db: f64) -> Self {
        let factor = db_to_linear(gain_db) as f32;
        for sample in &mut self.samples {
            *sample *= factor;
        }
        self
    }

    /// Copy a segment out into its own track
    pub fn extract(&self, segment: &Segment) -> Track {
        Track {
            samples: self.window(segment.start_ms, segment.end_ms).to_vec(),
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}
