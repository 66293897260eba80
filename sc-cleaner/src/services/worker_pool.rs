//! Bounded parallel execution of per-track jobs
//!
//! Each [`WorkerPool::run_all`] call builds a dedicated rayon pool, runs the
//! job once per track and drops the pool before returning, so no threads
//! outlive the batch. Outcomes come back in input order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CleanerError, CleanerResult};
use crate::models::{track_identifier, FailureReason, ProcessingOutcome};

/// Fixed-size worker pool
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Size the pool as `min(desired_threads, available CPUs)`
    ///
    /// `desired_threads` must be greater than 1.
    pub fn new(desired_threads: usize) -> CleanerResult<Self> {
        if desired_threads <= 1 {
            return Err(CleanerError::Config(format!(
                "desired_threads must be greater than 1, got {}",
                desired_threads
            )));
        }

        let cpu_count = num_cpus::get();
        let size = desired_threads.min(cpu_count).max(1);

        info!(desired_threads, cpu_count, size, "Worker pool sized");
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` for every track, blocking until all have an outcome
    ///
    /// A panicking job yields `Failure(WorkerPanicked)` for its track only.
    /// Tracks not yet started when `cancel` fires yield `Failure(Cancelled)`.
    pub fn run_all<F>(
        &self,
        tracks: &[PathBuf],
        cancel: &CancellationToken,
        job: F,
    ) -> CleanerResult<Vec<ProcessingOutcome>>
    where
        F: Fn(&Path) -> ProcessingOutcome + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.size)
            .thread_name(|i| format!("cleaner-worker-{}", i))
            .build()
            .map_err(|e| CleanerError::WorkerPool(e.to_string()))?;

        let total = tracks.len();
        let completed = AtomicUsize::new(0);

        debug!(total, threads = self.size, "Dispatching tracks");

        let outcomes = pool.install(|| {
            tracks
                .par_iter()
                .map(|track| {
                    let outcome = if cancel.is_cancelled() {
                        ProcessingOutcome::failure(track, FailureReason::Cancelled)
                    } else {
                        run_guarded(track, &job)
                    };

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(done, total, track = %track_identifier(track), "Track finished");
                    outcome
                })
                .collect::<Vec<_>>()
        });

        Ok(outcomes)
    }
}

fn run_guarded<F>(track: &Path, job: &F) -> ProcessingOutcome
where
    F: Fn(&Path) -> ProcessingOutcome + Sync,
{
    match catch_unwind(AssertUnwindSafe(|| job(track))) {
        Ok(outcome) => outcome,
        Err(panic_payload) => {
            let panic_msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic in worker".to_string()
            };

            warn!(track = %track_identifier(track), panic = %panic_msg, "Worker panicked");
            ProcessingOutcome::failure(track, FailureReason::WorkerPanicked(panic_msg))
        }
    }
}
