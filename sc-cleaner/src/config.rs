//! Configuration loading and validation for sc-cleaner
//!
//! Parameters come from (highest priority first) command-line overrides, a
//! TOML config file, and compiled defaults. The merged parameters are
//! validated once into an immutable [`CleanerConfig`] before any work starts.

use std::path::Path;

use sc_common::config::{load_or_default, ConfigFileResolver};
use tracing::debug;

use crate::error::{CleanerError, CleanerResult};
use crate::models::{CleanerParameters, OutputFormat, SilenceParameters};

/// Application name used for the user config directory
pub const APP_NAME: &str = "silence-cutter";

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SILENCE_CUTTER_CONFIG";

/// Load parameters from the resolved config file, or compiled defaults
pub fn load_parameters(cli_config: Option<&Path>) -> CleanerResult<CleanerParameters> {
    let resolver = ConfigFileResolver::new(APP_NAME, CONFIG_ENV_VAR);
    Ok(load_or_default(&resolver, cli_config)?)
}

/// Validated, immutable batch configuration
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    params: CleanerParameters,
}

impl CleanerConfig {
    /// Validate parameters
    ///
    /// Both dB values must be negative (relative to full scale), the silence
    /// cutoff must be non-zero and at least two worker threads are required.
    pub fn new(params: CleanerParameters) -> CleanerResult<Self> {
        let silence = &params.silence;

        if silence.threshold_db.is_nan() || silence.threshold_db >= 0.0 {
            return Err(CleanerError::Config(format!(
                "threshold_db must be negative dBFS, got {}",
                silence.threshold_db
            )));
        }

        if silence.target_volume_db.is_nan() || silence.target_volume_db >= 0.0 {
            return Err(CleanerError::Config(format!(
                "target_volume_db must be negative dBFS, got {}",
                silence.target_volume_db
            )));
        }

        if silence.silence_cutoff_ms == 0 {
            return Err(CleanerError::Config(
                "silence_cutoff_ms must be greater than 0".to_string(),
            ));
        }

        if params.desired_threads <= 1 {
            return Err(CleanerError::Config(format!(
                "desired_threads must be greater than 1, got {}",
                params.desired_threads
            )));
        }

        let mut params = params;
        params.input_extension = params.input_extension.trim_start_matches('.').to_lowercase();
        if params.input_extension.is_empty() {
            return Err(CleanerError::Config(
                "input_extension must not be empty".to_string(),
            ));
        }

        if params.mp3_bitrate_kbps == 0 {
            return Err(CleanerError::Config(
                "mp3_bitrate_kbps must be greater than 0".to_string(),
            ));
        }

        debug!(?params, "Configuration validated");
        Ok(Self { params })
    }

    pub fn silence(&self) -> &SilenceParameters {
        &self.params.silence
    }

    pub fn output_format(&self) -> OutputFormat {
        self.params.output_format
    }

    pub fn output_directory(&self) -> &Path {
        &self.params.output_directory
    }

    /// Input extension, lowercase without leading dot
    pub fn input_extension(&self) -> &str {
        &self.params.input_extension
    }

    pub fn desired_threads(&self) -> usize {
        self.params.desired_threads
    }

    pub fn mp3_bitrate_kbps(&self) -> u32 {
        self.params.mp3_bitrate_kbps
    }
}
