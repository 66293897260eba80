//! Batch orchestration
//!
//! Discovers the input tracks, recreates the output directory, fans the
//! tracks out to the [`WorkerPool`] on a blocking thread and folds the
//! outcomes into a [`BatchReport`].
//!
//! Only discovery and output-directory setup abort a batch; individual track
//! failures are recorded in the report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn};

use crate::config::CleanerConfig;
use crate::error::{CleanerError, CleanerResult};
use crate::models::{track_identifier, BatchReport, FailureReason, ProcessingOutcome};
use crate::services::file_scanner::FileScanner;
use crate::services::track_processor::TrackProcessor;
use crate::services::worker_pool::WorkerPool;

/// Batch orchestrator
pub struct BatchOrchestrator {
    config: CleanerConfig,
    pool: WorkerPool,
    scanner: FileScanner,
}

impl BatchOrchestrator {
    /// Create orchestrator, sizing the worker pool from `config`
    pub fn new(config: CleanerConfig) -> CleanerResult<Self> {
        let pool = WorkerPool::new(config.desired_threads())?;
        let scanner = FileScanner::new(config.input_extension());
        Ok(Self {
            config,
            pool,
            scanner,
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Process every matching track in `input_dir` into `output_dir`
    ///
    /// `output_dir` is deleted and recreated before any track is processed.
    pub async fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        cancel: CancellationToken,
    ) -> CleanerResult<BatchReport> {
        let tracks = self.scanner.scan(input_dir)?;
        info!(
            dir = %input_dir.display(),
            extension = %self.scanner.extension(),
            count = tracks.len(),
            "Discovered tracks"
        );

        prepare_output_dir(output_dir)?;

        let processor = Arc::new(TrackProcessor::new(&self.config, output_dir));
        let shadowed = shadowed_tracks(&tracks, &processor);
        let pool = self.pool;

        info!(tracks = tracks.len(), threads = pool.size(), "Starting batch");

        let outcomes = tokio::task::spawn_blocking(move || {
            pool.run_all(&tracks, &cancel, |track| {
                if shadowed.contains(track) {
                    let output = processor.output_path(track);
                    ProcessingOutcome::failure(track, FailureReason::DuplicateOutput { output })
                } else {
                    processor.process(track)
                }
            })
        })
        .await
        .map_err(|e| CleanerError::WorkerPool(format!("Batch task failed: {}", e)))??;

        let report = BatchReport::from_outcomes(outcomes);
        info!(
            total = report.total,
            succeeded = report.success_count,
            failed = report.failure_count(),
            "Batch complete"
        );

        Ok(report)
    }
}

/// Tracks whose output path was already claimed by an earlier track
///
/// Discovery matches extensions case-insensitively, so `a.wav` and `a.WAV`
/// both map to `a - cleaned.wav`. The first track in input order keeps it.
fn shadowed_tracks(tracks: &[PathBuf], processor: &TrackProcessor) -> HashSet<PathBuf> {
    let mut claimed = HashSet::new();
    let mut shadowed = HashSet::new();

    for track in tracks {
        let output = processor.output_path(track);
        if !claimed.insert(output.clone()) {
            warn!(
                track = %track_identifier(track),
                output = %output.display(),
                "Output already claimed by another track, skipping"
            );
            shadowed.insert(track.clone());
        }
    }

    shadowed
}

/// Remove `output_dir` if present and create it empty
pub fn prepare_output_dir(output_dir: &Path) -> CleanerResult<()> {
    let _setup = info_span!("setup", dir = %output_dir.display()).entered();

    if output_dir.exists() {
        std::fs::remove_dir_all(output_dir).map_err(|source| {
            error!(error = %source, "Removing the existing output directory failed");
            CleanerError::OutputDirRemove {
                path: output_dir.to_path_buf(),
                source,
            }
        })?;
        info!("Removed existing output directory");
    }

    std::fs::create_dir_all(output_dir).map_err(|source| {
        error!(error = %source, "Creation of the output directory failed");
        CleanerError::OutputDirCreate {
            path: PathBuf::from(output_dir),
            source,
        }
    })?;
    info!("Created output directory");

    Ok(())
}
