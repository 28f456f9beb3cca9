//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signals")]
#[command(author, version, about = "Daily heuristic trading signal pipeline")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "SIGNALS_CONFIG")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the configuration)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge newly arrived bars into the historical store
    Update(StageArgs),
    /// Snapshot daily indicator features from the recent windows
    Features(StageArgs),
    /// Run every configured strategy over every symbol
    Execute(StageArgs),
    /// Aggregate the latest signals and dispatch the report
    Aggregate(AggregateArgs),
    /// Update, features, execute and aggregate in sequence
    Pipeline(PipelineArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args, Clone, Default)]
pub struct StageArgs {
    /// Symbols to process instead of the roster (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

#[derive(clap::Args, Clone, Default)]
pub struct AggregateArgs {
    /// Report date (YYYY-MM-DD); defaults to the latest signal date
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Log the report instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Clone, Default)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    #[command(flatten)]
    pub report: AggregateArgs,
}
