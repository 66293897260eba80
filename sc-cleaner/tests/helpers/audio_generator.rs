//! Audio Test Fixture Generator
//!
//! Utilities for generating test WAV files built from tone and silence parts

use std::path::{Path, PathBuf};

/// One contiguous stretch of a generated track
#[derive(Debug, Clone, Copy)]
pub enum Part {
    /// 440Hz sine at the given peak amplitude (0.0..=1.0)
    Tone { amplitude: f32, seconds: f64 },
    /// Digital silence
    Silence { seconds: f64 },
}

impl Part {
    pub fn tone(amplitude: f32, seconds: f64) -> Self {
        Part::Tone { amplitude, seconds }
    }

    pub fn silence(seconds: f64) -> Self {
        Part::Silence { seconds }
    }

    fn seconds(&self) -> f64 {
        match *self {
            Part::Tone { seconds, .. } | Part::Silence { seconds } => seconds,
        }
    }
}

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub parts: Vec<Part>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            parts: vec![Part::tone(0.5, 5.0)],
        }
    }
}

impl AudioConfig {
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Default::default()
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.parts.iter().map(Part::seconds).sum()
    }
}

/// Generate a test WAV file with specified configuration
///
/// # Arguments
/// * `path` - Output file path
/// * `config` - Audio configuration
///
/// # Returns
/// Generated file path
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let mut frame_index = 0usize;

    for part in &config.parts {
        let frames = (part.seconds() * config.sample_rate as f64).round() as usize;
        for _ in 0..frames {
            let sample = match *part {
                Part::Silence { .. } => 0,
                Part::Tone { amplitude, .. } => {
                    let t = frame_index as f32 / config.sample_rate as f32;
                    let freq = 440.0;
                    (amplitude * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32)
                        as i16
                }
            };

            // Same sample on every channel
            for _ in 0..config.channels {
                writer.write_sample(sample)?;
            }
            frame_index += 1;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Generate multiple test audio files in a directory
///
/// Files are named `test_track_001.wav`, `test_track_002.wav`, ...
pub fn generate_test_library(
    dir: &Path,
    count: usize,
    config: &AudioConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for i in 0..count {
        let filename = format!("test_track_{:03}.wav", i + 1);
        let file_path = dir.join(filename);
        generate_test_wav(&file_path, config)?;
        files.push(file_path);
    }

    Ok(files)
}

/// Duration and loudness of a 16-bit WAV file
#[derive(Debug, Clone, Copy)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub duration_ms: u64,
    pub loudness_dbfs: f64,
}

/// Read back a 16-bit WAV file written by the exporter
pub fn measure_wav(path: &Path) -> anyhow::Result<WavSummary> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.duration() as u64;

    let mut sum_squares = 0.0f64;
    let mut count = 0usize;
    for sample in reader.samples::<i16>() {
        let s = sample? as f64 / 32768.0;
        sum_squares += s * s;
        count += 1;
    }

    let rms = if count == 0 {
        0.0
    } else {
        (sum_squares / count as f64).sqrt()
    };

    Ok(WavSummary {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        duration_ms: (frames as f64 / spec.sample_rate as f64 * 1000.0).round() as u64,
        loudness_dbfs: sc_common::decibels::linear_to_db(rms),
    })
}
