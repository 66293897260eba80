//! Error types for sc-cleaner
//!
//! Only configuration, setup and discovery errors abort a batch. Everything
//! that goes wrong with an individual track is recorded as a
//! [`FailureReason`](crate::models::FailureReason) instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::services::file_scanner::ScanError;

/// Batch-fatal error
#[derive(Debug, Error)]
pub enum CleanerError {
    /// Invalid configuration (thread count, dB sign, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output directory could not be removed
    #[error("Removing the existing output directory {path} failed: {source}")]
    OutputDirRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory could not be created
    #[error("Creation of the output directory {path} failed: {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input tracks could not be discovered
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Worker pool could not be started or joined
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// sc-common error (config file loading)
    #[error(transparent)]
    Common(#[from] sc_common::Error),
}

impl CleanerError {
    /// True for errors raised while preparing the output directory
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            CleanerError::OutputDirRemove { .. } | CleanerError::OutputDirCreate { .. }
        )
    }
}

/// Result type for batch-level operations
pub type CleanerResult<T> = Result<T, CleanerError>;
