use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trendmap::aggregate;
use trendmap::cli::Cli;
use trendmap::config::{AppConfig, CONFIG_PATH};
use trendmap::ingest::{self, RunSummary};
use trendmap::region::{self, Region};
use trendmap::source::HttpSource;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("Created default configuration file at: {}", path.display());
                println!("Edit it to customize settings, then run trendmap again.");
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("Failed to create configuration file: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    // Configuration problems are the only fatal failures; everything
    // past this point degrades per region instead of aborting.
    let config = {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| Path::new(CONFIG_PATH).to_path_buf());
        match AppConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                eprintln!("Run with --init to create a default configuration file.");
                return ExitCode::FAILURE;
            }
        }
    };

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    if let Some(concurrency) = cli.concurrency {
        if concurrency == 0 {
            anyhow::bail!("--concurrency must be positive");
        }
        config.ingest.concurrency = concurrency;
    }
    if let Some(output) = cli.output {
        config.output.store_path = output;
    }

    let regions: Vec<&'static Region> = match &cli.states {
        Some(list) => region::parse_code_list(list).map_err(|e| anyhow::anyhow!(e))?,
        None => region::US_STATES.iter().collect(),
    };
    if regions.is_empty() {
        anyhow::bail!("No regions selected");
    }

    let run_started = Utc::now();
    info!(
        regions = regions.len(),
        concurrency = config.ingest.concurrency,
        "starting ingestion run"
    );

    let source = Arc::new(HttpSource::new(&config.http)?);
    let (records, summary) =
        ingest::run_batch(source, &regions, &config.ingest, run_started).await;

    if cli.dry_run {
        info!("dry run: skipping store write-back");
    } else {
        let previous = aggregate::load_store(&config.output.store_path, run_started);
        let merged = aggregate::merge_store(previous, records, run_started);
        aggregate::save_store(&config.output.store_path, &merged)?;
        info!(
            path = %config.output.store_path.display(),
            states = merged.states.len(),
            "aggregate store updated"
        );
    }

    if cli.json_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if summary.succeeded == 0 && summary.total_regions > 0 {
        warn!("no region produced topics this run");
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Run complete: {}/{} regions succeeded, {} empty, {} failed ({:.1}s)",
        summary.succeeded,
        summary.total_regions,
        summary.empty,
        summary.failed,
        summary.total_duration_secs
    );
    for outcome in &summary.outcomes {
        let detail = match &outcome.error {
            Some(error) => format!(" ({})", error),
            None => String::new(),
        };
        println!(
            "  {}  {:<22} {:?}  {} topics{}",
            outcome.code, outcome.name, outcome.status, outcome.topic_count, detail
        );
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trendmap={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
