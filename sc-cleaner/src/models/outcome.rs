//! Per-track processing outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a track was not exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// Input could not be read or decoded
    LoadError(String),
    /// More than one non-silent segment survived trimming
    AmbiguousSegmentation { segments: usize },
    /// No non-silent audio at all
    EntirelySilent,
    /// Encoding, file write or tag write failed
    ExportError(String),
    /// The worker panicked while processing the track
    WorkerPanicked(String),
    /// Batch was cancelled before the track started
    Cancelled,
    /// An earlier track in the batch already maps to the same output file
    DuplicateOutput { output: PathBuf },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LoadError(msg) => write!(f, "load error: {}", msg),
            FailureReason::AmbiguousSegmentation { segments } => {
                write!(f, "too many chunks ({}), cannot export", segments)
            }
            FailureReason::EntirelySilent => write!(f, "track is entirely silent"),
            FailureReason::ExportError(msg) => write!(f, "export error: {}", msg),
            FailureReason::WorkerPanicked(msg) => write!(f, "worker panicked: {}", msg),
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::DuplicateOutput { output } => {
                write!(f, "output {} already produced by another track", output.display())
            }
        }
    }
}

/// Result of processing one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    Success { track: PathBuf, output: PathBuf },
    Failure { track: PathBuf, reason: FailureReason },
}

impl ProcessingOutcome {
    pub fn success(track: &Path, output: PathBuf) -> Self {
        ProcessingOutcome::Success {
            track: track.to_path_buf(),
            output,
        }
    }

    pub fn failure(track: &Path, reason: FailureReason) -> Self {
        ProcessingOutcome::Failure {
            track: track.to_path_buf(),
            reason,
        }
    }

    /// Input track this outcome belongs to
    pub fn track(&self) -> &Path {
        match self {
            ProcessingOutcome::Success { track, .. } | ProcessingOutcome::Failure { track, .. } => {
                track
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            ProcessingOutcome::Failure { reason, .. } => Some(reason),
            ProcessingOutcome::Success { .. } => None,
        }
    }
}

/// Display identifier for a track: its file name, or the full path if it has none
pub fn track_identifier(track: &Path) -> String {
    track
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| track.display().to_string())
}
