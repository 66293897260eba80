//! silence-cutter - Main entry point
//!
//! Trims leading and trailing silence from every track in a directory,
//! normalizes quiet tracks to a target loudness and writes the results to a
//! freshly recreated output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sc_cleaner::models::OutputFormat;
use sc_cleaner::{load_parameters, BatchOrchestrator, CleanerConfig};

/// Command-line arguments for silence-cutter
#[derive(Parser, Debug)]
#[command(name = "silence-cutter")]
#[command(about = "Trim silence and normalize loudness for a directory of audio tracks")]
#[command(version)]
struct Args {
    /// Directory containing the tracks to clean
    #[arg(default_value = ".")]
    input_dir: PathBuf,

    /// Output directory (deleted and recreated on every run)
    #[arg(short, long, env = "SILENCE_CUTTER_OUTPUT")]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Desired number of worker threads (must be greater than 1)
    #[arg(short, long, env = "SILENCE_CUTTER_THREADS")]
    threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sc_cleaner=info,silence_cutter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting silence-cutter v{}", env!("CARGO_PKG_VERSION"));

    let mut params =
        load_parameters(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(output) = args.output {
        params.output_directory = output;
    }
    if let Some(threads) = args.threads {
        params.desired_threads = threads;
    }
    if let Some(format) = args.format {
        params.output_format = format;
    }

    let config = CleanerConfig::new(params).context("Invalid configuration")?;
    let output_dir = config.output_directory().to_path_buf();

    info!("Input directory: {}", args.input_dir.display());
    info!("Output directory: {}", output_dir.display());

    let orchestrator =
        BatchOrchestrator::new(config).context("Failed to initialize worker pool")?;
    info!("Worker threads: {}", orchestrator.pool_size());

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let report = orchestrator
        .run(&args.input_dir, &output_dir, cancel)
        .await
        .context("Batch aborted")?;

    if args.json {
        let json = report.to_json().context("Failed to serialize report")?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

/// Cancel tracks that have not started yet on Ctrl+C
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            warn!("Received Ctrl+C, finishing in-flight tracks and skipping the rest");
            cancel.cancel();
        }
        Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
    }
}
