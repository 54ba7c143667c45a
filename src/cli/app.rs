//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{analyze, config_cmd, recalc, stats};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "shape-priority")]
#[command(author, version, about = "Dependency-aware task priority recalculation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Priority settings file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true, env = "SHAPE_PRIORITY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recalculate priorities in a JSONL task file
    Recalc {
        /// Path to the tasks file
        tasks: PathBuf,

        /// Evaluate ages as of this RFC 3339 timestamp instead of now
        #[arg(long)]
        now: Option<String>,

        /// Show adjustments without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize the dependency structure of a task file
    Analyze {
        /// Path to the tasks file
        tasks: PathBuf,
    },

    /// Show priority statistics for a JSONL task file
    Stats {
        /// Path to the tasks file
        tasks: PathBuf,
    },

    /// List the available time decay models
    Models,

    /// Show the effective priority settings
    Config,
}

/// Installs the stderr log subscriber
///
/// `--verbose` forces debug output for this crate; otherwise `RUST_LOG`
/// applies, falling back to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("shape_priority=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output::new(cli.format);
    let config = Config::load(cli.config.as_deref())?;
    debug!(source = ?config.source, "Loaded priority settings");

    match cli.command {
        Commands::Recalc {
            tasks,
            now,
            dry_run,
        } => recalc::run(&output, &config, &tasks, now.as_deref(), dry_run)?,
        Commands::Analyze { tasks } => analyze::run(&output, &config, &tasks)?,
        Commands::Stats { tasks } => stats::run(&output, &config, &tasks)?,
        Commands::Models => stats::run_models(&output, &config)?,
        Commands::Config => config_cmd::run(&output, &config)?,
    }

    Ok(())
}
