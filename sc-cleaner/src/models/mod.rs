//! Data models for sc-cleaner

pub mod outcome;
pub mod parameters;
pub mod report;
pub mod track;

pub use outcome::{track_identifier, FailureReason, ProcessingOutcome};
pub use parameters::{CleanerParameters, OutputFormat, SilenceParameters};
pub use report::{BatchReport, TrackFailure};
pub use track::{Segment, Track};
