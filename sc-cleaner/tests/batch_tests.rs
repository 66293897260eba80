//! End-to-end batch tests
//!
//! Generate small WAV libraries, run the orchestrator and inspect the output
//! directory and the batch report.

mod helpers;

use std::path::{Path, PathBuf};

use helpers::{generate_test_library, generate_test_wav, measure_wav, AudioConfig, Part};
use sc_cleaner::models::{CleanerParameters, OutputFormat};
use sc_cleaner::{BatchOrchestrator, CleanerConfig, CleanerError, FailureReason};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn wav_config(threads: usize) -> CleanerConfig {
    let params = CleanerParameters {
        output_format: OutputFormat::Wav,
        input_extension: "wav".to_string(),
        desired_threads: threads,
        ..CleanerParameters::default()
    };
    CleanerConfig::new(params).unwrap()
}

/// a: padded by silence, b: quiet without silence, c: two tones split by 5s of silence
fn generate_abc(dir: &Path) {
    generate_test_wav(
        &dir.join("a.wav"),
        &AudioConfig::with_parts(vec![
            Part::silence(4.0),
            Part::tone(0.5, 6.0),
            Part::silence(4.0),
        ]),
    )
    .unwrap();
    generate_test_wav(
        &dir.join("b.wav"),
        &AudioConfig::with_parts(vec![Part::tone(0.05, 5.0)]),
    )
    .unwrap();
    generate_test_wav(
        &dir.join("c.wav"),
        &AudioConfig::with_parts(vec![
            Part::tone(0.5, 4.0),
            Part::silence(5.0),
            Part::tone(0.5, 4.0),
        ]),
    )
    .unwrap();
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_abc_batch_end_to_end() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    generate_abc(input.path());

    let orchestrator = BatchOrchestrator::new(wav_config(4)).unwrap();
    let report = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count(), 1);
    assert!((report.failure_percentage() - 100.0 / 3.0).abs() < 0.01);

    let failure = &report.failures[0];
    assert_eq!(failure.track.file_name().unwrap(), "c.wav");
    assert_eq!(
        failure.reason,
        FailureReason::AmbiguousSegmentation { segments: 2 }
    );

    assert_eq!(
        file_names(&output),
        vec!["a - cleaned.wav".to_string(), "b - cleaned.wav".to_string()]
    );

    // a: 6s of tone plus 2s kept on each side; a few ms of tone at each edge
    // fall inside windows that still measure below the threshold
    let a = measure_wav(&output.join("a - cleaned.wav")).unwrap();
    assert!(
        (9_970..=10_000).contains(&a.duration_ms),
        "a duration {} ms",
        a.duration_ms
    );

    // b: silence-free, boosted to the -15 dBFS target
    let b = measure_wav(&output.join("b - cleaned.wav")).unwrap();
    assert_eq!(b.duration_ms, 5_000);
    assert!(
        (b.loudness_dbfs - (-15.0)).abs() < 0.05,
        "b loudness {} dBFS",
        b.loudness_dbfs
    );

    let summary = report.to_string();
    assert!(summary.contains("There were 1 failures (33.3%)"));
    assert!(summary.contains("- c.wav (too many chunks (2), cannot export)"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    generate_abc(input.path());

    let orchestrator = BatchOrchestrator::new(wav_config(3)).unwrap();

    let first = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();
    let first_bytes = std::fs::read(output.join("a - cleaned.wav")).unwrap();

    // Stale file from "a previous run" must be swept away
    std::fs::write(output.join("stale.wav"), b"x").unwrap();

    let second = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();
    let second_bytes = std::fs::read(output.join("a - cleaned.wav")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(file_names(&output).len(), 2);
}

#[tokio::test]
async fn test_empty_input_reports_zero_percent() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    std::fs::write(input.path().join("readme.txt"), b"not audio").unwrap();

    let orchestrator = BatchOrchestrator::new(wav_config(2)).unwrap();
    let report = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    assert_eq!(report.failure_percentage(), 0.0);
    assert!(output.is_dir());
    assert!(report.to_string().contains("There were no detected errors"));
}

#[tokio::test]
async fn test_blocked_output_dir_aborts_before_processing() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    generate_abc(input.path());

    let blocked = work.path().join("output");
    std::fs::write(&blocked, b"a file where the directory should go").unwrap();

    let orchestrator = BatchOrchestrator::new(wav_config(2)).unwrap();
    let err = orchestrator
        .run(input.path(), &blocked, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_setup_error(), "unexpected error: {}", err);
    assert!(blocked.is_file());
}

#[tokio::test]
async fn test_missing_input_dir_is_scan_error() {
    let work = TempDir::new().unwrap();
    let orchestrator = BatchOrchestrator::new(wav_config(2)).unwrap();

    let err = orchestrator
        .run(
            &work.path().join("does-not-exist"),
            &work.path().join("output"),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CleanerError::Scan(_)));
}

#[tokio::test]
async fn test_cancelled_batch_skips_all_tracks() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    generate_abc(input.path());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let orchestrator = BatchOrchestrator::new(wav_config(2)).unwrap();
    let report = orchestrator.run(input.path(), &output, cancel).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.success_count, 0);
    assert!(report
        .failures
        .iter()
        .all(|f| f.reason == FailureReason::Cancelled));
    assert!(file_names(&output).is_empty());
}

#[tokio::test]
async fn test_load_failure_does_not_stop_batch() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    generate_abc(input.path());
    std::fs::write(input.path().join("broken.wav"), b"RIFF garbage").unwrap();

    let orchestrator = BatchOrchestrator::new(wav_config(4)).unwrap();
    let report = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.success_count, 2);

    let failed: Vec<PathBuf> = report
        .failures
        .iter()
        .map(|f| PathBuf::from(f.track.file_name().unwrap()))
        .collect();
    assert_eq!(failed, vec![PathBuf::from("broken.wav"), PathBuf::from("c.wav")]);
    assert!(matches!(
        report.failures[0].reason,
        FailureReason::LoadError(_)
    ));
}

#[tokio::test]
async fn test_case_variant_names_do_not_overwrite_each_other() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");

    // Same stem, extensions differing only in case: both map to "a - cleaned.wav"
    generate_test_wav(
        &input.path().join("a.WAV"),
        &AudioConfig::with_parts(vec![Part::tone(0.5, 3.0)]),
    )
    .unwrap();
    generate_test_wav(
        &input.path().join("a.wav"),
        &AudioConfig::with_parts(vec![Part::tone(0.5, 5.0)]),
    )
    .unwrap();

    let orchestrator = BatchOrchestrator::new(wav_config(2)).unwrap();
    let report = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failures.len(), 1);

    // Sorted discovery puts a.WAV first, so it keeps the output
    let failure = &report.failures[0];
    assert_eq!(failure.track.file_name().unwrap(), "a.wav");
    assert_eq!(
        failure.reason,
        FailureReason::DuplicateOutput {
            output: output.join("a - cleaned.wav")
        }
    );

    assert_eq!(file_names(&output), vec!["a - cleaned.wav".to_string()]);
    let kept = measure_wav(&output.join("a - cleaned.wav")).unwrap();
    assert_eq!(kept.duration_ms, 3_000);
}

#[tokio::test]
async fn test_library_larger_than_pool() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output");
    let tracks = generate_test_library(input.path(), 8, &AudioConfig::default()).unwrap();

    let orchestrator = BatchOrchestrator::new(wav_config(3)).unwrap();
    assert!(orchestrator.pool_size() <= 3);

    let report = orchestrator
        .run(input.path(), &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, tracks.len());
    assert_eq!(report.success_count, 8);
    assert_eq!(file_names(&output).len(), 8);
    assert!(output.join("test_track_008 - cleaned.wav").is_file());
}

#[test]
fn test_single_thread_config_rejected() {
    let params = CleanerParameters {
        desired_threads: 1,
        ..CleanerParameters::default()
    };
    assert!(matches!(
        CleanerConfig::new(params),
        Err(CleanerError::Config(_))
    ));
}
