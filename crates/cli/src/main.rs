//! Metric Sentinel CLI
//!
//! One-shot utilities around the sentinel's metric source. Currently a
//! single command: exporting a historical time range to a flat file.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Metric Sentinel CLI
#[derive(Parser)]
#[command(name = "msctl")]
#[command(author, version, about = "CLI for Metric Sentinel", long_about = None)]
pub struct Cli {
    /// Path to the sentinel config file (can also be set via SENTINEL_CONFIG)
    #[arg(long, env = "SENTINEL_CONFIG", default_value = "sentinel.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a historical time range of the watched metric to a file
    Export {
        /// How many hours back from now to export
        #[arg(long, default_value_t = 6)]
        hours: u64,

        /// Range query resolution in seconds
        #[arg(long, default_value_t = 60)]
        step_secs: u64,

        /// Output file path (overwritten on each run)
        #[arg(long, short, default_value = "cpu_metrics.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            hours,
            step_secs,
            out,
        } => commands::export::run(&cli.config, hours, step_secs, &out).await,
    }
}
