//! Single-track pipeline: decode, normalize, trim, export
//!
//! Every failure is captured in the returned [`ProcessingOutcome`]; nothing
//! here propagates an error to the batch. A file is written only when the
//! track trims to exactly one segment.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::CleanerConfig;
use crate::models::{track_identifier, FailureReason, ProcessingOutcome};
use crate::services::amplitude_normalizer::AmplitudeNormalizer;
use crate::services::metadata_carrier::MetadataCarrier;
use crate::services::silence_trimmer::SilenceTrimmer;
use crate::services::track_exporter::TrackExporter;
use crate::utils::audio_decoder::decode_track;

/// Suffix inserted between the source stem and the output extension
const CLEANED_SUFFIX: &str = " - cleaned";

/// Per-track processor, shared read-only by all workers
#[derive(Debug, Clone)]
pub struct TrackProcessor {
    normalizer: AmplitudeNormalizer,
    trimmer: SilenceTrimmer,
    exporter: TrackExporter,
    metadata: MetadataCarrier,
    output_dir: PathBuf,
}

impl TrackProcessor {
    pub fn new(config: &CleanerConfig, output_dir: impl Into<PathBuf>) -> Self {
        let silence = *config.silence();
        Self {
            normalizer: AmplitudeNormalizer::new(silence.target_volume_db),
            trimmer: SilenceTrimmer::new(silence),
            exporter: TrackExporter::new(config.output_format(), config.mp3_bitrate_kbps()),
            metadata: MetadataCarrier::new(config.output_format()),
            output_dir: output_dir.into(),
        }
    }

    /// Output path for `track_path`: `<output_dir>/<stem> - cleaned.<ext>`
    ///
    /// Only the final extension of the source name is stripped.
    pub fn output_path(&self, track_path: &Path) -> PathBuf {
        let stem = track_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.output_dir.join(format!(
            "{}{}.{}",
            stem,
            CLEANED_SUFFIX,
            self.exporter.format().extension()
        ))
    }

    /// Process one track
    pub fn process(&self, track_path: &Path) -> ProcessingOutcome {
        let name = track_identifier(track_path);

        info!(track = %name, "Loading");
        let track = match decode_track(track_path) {
            Ok(track) => track,
            Err(e) => {
                error!(track = %name, error = %e, "Could not load track");
                return ProcessingOutcome::failure(
                    track_path,
                    FailureReason::LoadError(format!("{:#}", e)),
                );
            }
        };

        info!(track = %name, duration_ms = track.duration_ms(), "Processing");
        let track = self.normalizer.normalize(track);

        let segments: Vec<_> = self.trimmer.trim(&track).collect();
        debug!(track = %name, ?segments, "Segmentation complete");

        let segment = match segments.as_slice() {
            [segment] => *segment,
            [] => {
                warn!(track = %name, "Track is entirely silent, nothing to export");
                return ProcessingOutcome::failure(track_path, FailureReason::EntirelySilent);
            }
            _ => {
                warn!(
                    track = %name,
                    segments = segments.len(),
                    "Too many chunks, cannot export"
                );
                return ProcessingOutcome::failure(
                    track_path,
                    FailureReason::AmbiguousSegmentation {
                        segments: segments.len(),
                    },
                );
            }
        };

        let trimmed = track.extract(&segment);
        let output = self.output_path(track_path);

        let tags = match self.metadata.read_tags(track_path) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(track = %name, error = %e, "Exporting without tags");
                None
            }
        };

        info!(
            track = %name,
            start_ms = segment.start_ms,
            end_ms = segment.end_ms,
            duration_ms = segment.duration_ms(),
            "Exporting"
        );

        let written = commit_output(&output, |output| {
            self.exporter
                .export(&trimmed, output)
                .map_err(|e| FailureReason::ExportError(e.to_string()))?;
            if let Some(tags) = tags {
                self.metadata
                    .write_tags(tags, output)
                    .map_err(|e| FailureReason::ExportError(e.to_string()))?;
            }
            Ok(())
        });

        if let Err(reason) = written {
            error!(track = %name, %reason, "Export failed");
            return ProcessingOutcome::failure(track_path, reason);
        }

        info!(track = %name, output = %output.display(), "Exported");
        ProcessingOutcome::success(track_path, output)
    }
}

/// Run `write` against `output`, removing whatever it left behind on failure
fn commit_output<F>(output: &Path, write: F) -> Result<(), FailureReason>
where
    F: FnOnce(&Path) -> Result<(), FailureReason>,
{
    let result = write(output);
    if result.is_err() {
        match std::fs::remove_file(output) {
            Ok(()) => debug!(output = %output.display(), "Removed partial output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                output = %output.display(),
                error = %e,
                "Could not remove partial output"
            ),
        }
    }
    result
}
