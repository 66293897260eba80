//! Service modules for the track cleaning pipeline

pub mod amplitude_normalizer;
pub mod batch_orchestrator;
pub mod file_scanner;
pub mod metadata_carrier;
pub mod silence_trimmer;
pub mod track_exporter;
pub mod track_processor;
pub mod worker_pool;

pub use amplitude_normalizer::AmplitudeNormalizer;
pub use batch_orchestrator::{prepare_output_dir, BatchOrchestrator};
pub use file_scanner::{FileScanner, ScanError};
pub use metadata_carrier::{MetadataCarrier, MetadataError};
pub use silence_trimmer::{NonSilentSpans, Segments, SilenceTrimmer, SilentRun, SilentRuns};
pub use track_exporter::{ExportError, TrackExporter};
pub use track_processor::TrackProcessor;
pub use worker_pool::WorkerPool;
