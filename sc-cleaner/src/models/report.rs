//! Batch completion report

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::outcome::{track_identifier, FailureReason, ProcessingOutcome};

/// One failed track in a batch report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFailure {
    pub track: PathBuf,
    pub reason: FailureReason,
}

/// Aggregate result of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Tracks discovered and dispatched
    pub total: usize,
    /// Tracks exported successfully
    pub success_count: usize,
    /// Output files written, in input order
    pub outputs: Vec<PathBuf>,
    /// Failed tracks, in input order
    pub failures: Vec<TrackFailure>,
}

impl BatchReport {
    /// Aggregate outcomes (collected in input order) into a report
    pub fn from_outcomes(outcomes: Vec<ProcessingOutcome>) -> Self {
        let total = outcomes.len();
        let mut outputs = Vec::new();
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                ProcessingOutcome::Success { output, .. } => outputs.push(output),
                ProcessingOutcome::Failure { track, reason } => {
                    failures.push(TrackFailure { track, reason })
                }
            }
        }

        Self {
            total,
            success_count: outputs.len(),
            outputs,
            failures,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Failed tracks as a percentage of all tracks (0 when no tracks ran)
    pub fn failure_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.failure_count() as f64 / self.total as f64 * 100.0
    }

    /// JSON form including the derived failure percentage
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        value["failure_count"] = serde_json::json!(self.failure_count());
        value["failure_percentage"] = serde_json::json!(self.failure_percentage());
        Ok(value)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All files processed: {} track(s)", self.total)?;

        if self.failures.is_empty() {
            return write!(f, "There were no detected errors");
        }

        write!(
            f,
            "There were {} failures ({:.1}%) on the following tracks:",
            self.failure_count(),
            self.failure_percentage()
        )?;
        for failure in &self.failures {
            write!(f, "\n- {} ({})", track_identifier(&failure.track), failure.reason)?;
        }
        Ok(())
    }
}
