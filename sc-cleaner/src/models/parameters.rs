//! Cleaning parameters
//!
//! Raw, deserializable parameter records. These are validated into a
//! [`CleanerConfig`](crate::config::CleanerConfig) before any work starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Silence detection and normalization parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceParameters {
    /// Minimum silence duration treated as a cut point (default: 2500ms)
    pub silence_cutoff_ms: u64,

    /// Level at or below which audio is silent, dBFS (default: -35dB)
    pub threshold_db: f64,

    /// Silence retained around kept audio (default: 2000ms)
    pub keep_silence_ms: u64,

    /// Normalization target, dBFS (default: -15dB)
    pub target_volume_db: f64,
}

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MPEG-1 Layer III via LAME
    Mp3,
    /// 16-bit PCM WAV
    Wav,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Batch cleaning parameters
///
/// Deserialized from a flat TOML table; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ParameterFile")]
pub struct CleanerParameters {
    pub silence: SilenceParameters,

    /// Output format (default: mp3)
    pub output_format: OutputFormat,

    /// Output directory, recreated on every run (default: ./output/)
    pub output_directory: PathBuf,

    /// Extension of input tracks to pick up (default: mp3)
    pub input_extension: String,

    /// Requested worker threads, must be > 1 (default: 6)
    pub desired_threads: usize,

    /// MP3 bitrate in kbps (default: 128)
    pub mp3_bitrate_kbps: u32,
}

/// Config file schema
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterFile {
    #[serde(default = "default_silence_cutoff_ms")]
    silence_cutoff_ms: u64,
    #[serde(default = "default_threshold_db")]
    threshold_db: f64,
    #[serde(default = "default_keep_silence_ms")]
    keep_silence_ms: u64,
    #[serde(default = "default_target_volume_db")]
    target_volume_db: f64,
    #[serde(default = "default_output_format")]
    output_format: OutputFormat,
    #[serde(default = "default_output_directory")]
    output_directory: PathBuf,
    #[serde(default = "default_input_extension")]
    input_extension: String,
    #[serde(default = "default_desired_threads")]
    desired_threads: usize,
    #[serde(default = "default_mp3_bitrate_kbps")]
    mp3_bitrate_kbps: u32,
}

impl From<ParameterFile> for CleanerParameters {
    fn from(file: ParameterFile) -> Self {
        Self {
            silence: SilenceParameters {
                silence_cutoff_ms: file.silence_cutoff_ms,
                threshold_db: file.threshold_db,
                keep_silence_ms: file.keep_silence_ms,
                target_volume_db: file.target_volume_db,
            },
            output_format: file.output_format,
            output_directory: file.output_directory,
            input_extension: file.input_extension,
            desired_threads: file.desired_threads,
            mp3_bitrate_kbps: file.mp3_bitrate_kbps,
        }
    }
}

// Default value functions
fn default_silence_cutoff_ms() -> u64 {
    2500
}

fn default_threshold_db() -> f64 {
    -35.0
}

fn default_keep_silence_ms() -> u64 {
    2000
}

fn default_target_volume_db() -> f64 {
    -15.0
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Mp3
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output/")
}

fn default_input_extension() -> String {
    "mp3".to_string()
}

fn default_desired_threads() -> usize {
    6
}

fn default_mp3_bitrate_kbps() -> u32 {
    128
}

impl Default for SilenceParameters {
    fn default() -> Self {
        Self {
            silence_cutoff_ms: default_silence_cutoff_ms(),
            threshold_db: default_threshold_db(),
            keep_silence_ms: default_keep_silence_ms(),
            target_volume_db: default_target_volume_db(),
        }
    }
}

impl Default for CleanerParameters {
    fn default() -> Self {
        Self {
            silence: SilenceParameters::default(),
            output_format: default_output_format(),
            output_directory: default_output_directory(),
            input_extension: default_input_extension(),
            desired_threads: default_desired_threads(),
            mp3_bitrate_kbps: default_mp3_bitrate_kbps(),
        }
    }
}
