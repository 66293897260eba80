//! sc-cleaner: batch silence trimming and loudness normalization
//!
//! Library interface used by the `silence-cutter` binary and the integration
//! tests.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::config::{load_parameters, CleanerConfig};
pub use crate::error::{CleanerError, CleanerResult};
pub use crate::models::{BatchReport, FailureReason, ProcessingOutcome};
pub use crate::services::BatchOrchestrator;
