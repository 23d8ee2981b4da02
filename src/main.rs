use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use chopfinder::{BatchRunner, ChopDetector, DetectorConfig, ImageLoader, ImageSource, parse_source_list};

#[derive(Parser)]
#[command(name = "chopfinder")]
#[command(about = "Locate a meat chop in photographs and report its bounding box")]
struct Cli {
    /// Image paths or URLs; a JSON array piped on stdin takes priority
    #[arg(value_name = "SOURCE")]
    sources: Vec<String>,

    /// Detector configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the minimum accepted area ratio
    #[arg(long)]
    min_area_ratio: Option<f64>,

    /// Override the maximum accepted area ratio
    #[arg(long)]
    max_area_ratio: Option<f64>,

    /// Number of images processed concurrently
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn read_stdin_sources() -> anyhow::Result<Vec<ImageSource>> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read stdin")?;
    parse_source_list(&raw)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(min) = args.min_area_ratio {
        config.min_area_ratio = min;
    }
    if let Some(max) = args.max_area_ratio {
        config.max_area_ratio = max;
    }

    let mut detector = ChopDetector::new().with_config(config)?;
    if let Some(debug_dir) = args.debug_out {
        detector = detector.with_debug(debug_dir)?;
    }

    // Piped stdin wins; an empty pipe falls back to the positional sources
    let mut sources = if std::io::stdin().is_terminal() {
        Vec::new()
    } else {
        read_stdin_sources().await?
    };
    if sources.is_empty() {
        sources = args.sources.iter().map(|s| ImageSource::parse(s)).collect();
    }
    if sources.is_empty() {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    tracing::info!("Processing {} image(s)", sources.len());

    let mut runner = BatchRunner::new(detector, ImageLoader::new()?);
    if let Some(jobs) = args.jobs {
        runner = runner.with_jobs(jobs);
    }

    let records = runner.run(sources).await;
    let detected = records.iter().filter(|r| r.result().is_some()).count();
    tracing::info!("Detected chops in {}/{} image(s)", detected, records.len());

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
