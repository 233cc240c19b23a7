use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "trendmap")]
#[command(about = "Scrapes per-state trending topics into a merged, scored, classified dataset")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/trendmap.toml
    #[arg(long)]
    pub init: bool,

    /// Path to the configuration file (defaults to ./config/trendmap.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated region codes to ingest (e.g. "CA,NY,TX");
    /// defaults to all tracked regions
    #[arg(short, long, value_name = "CODES")]
    pub states: Option<String>,

    /// Regions fetched in parallel (overrides config)
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Aggregate store path (overrides config)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run the batch but skip the store write-back
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json_summary: bool,

    /// Verbose logging (use -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
