//! Daily heuristic signal pipeline CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::commands::Workspace;
use cli::{Cli, Commands};
use signals_config::{load_config, AppConfig, ConfigError};
use signals_monitor::setup_logging;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    // Setup logging; the config only contributes when it loaded
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace".to_string(),
        Some(cli::LogLevel::Debug) => "debug".to_string(),
        Some(cli::LogLevel::Info) => "info".to_string(),
        Some(cli::LogLevel::Warn) => "warn".to_string(),
        Some(cli::LogLevel::Error) => "error".to_string(),
        None => config
            .as_ref()
            .map(|c| c.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string()),
    };
    let json = cli.json_logs
        || config
            .as_ref()
            .is_ok_and(|c| c.logging.format == "json");
    let log_dir = config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.directory.clone());
    let _guard = setup_logging(&log_level, json, log_dir.as_deref());

    match cli.command {
        Commands::Strategies => cli::commands::strategies::run(config.ok().as_ref()),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, config),
        Commands::Update(args) => cli::commands::update::run(&open(&cli.config, config)?, args),
        Commands::Features(args) => cli::commands::features::run(&open(&cli.config, config)?, args),
        Commands::Execute(args) => cli::commands::execute::run(&open(&cli.config, config)?, args),
        Commands::Aggregate(args) => {
            cli::commands::aggregate::run(&open(&cli.config, config)?, args)
        }
        Commands::Pipeline(args) => cli::commands::pipeline::run(&open(&cli.config, config)?, args),
    }
}

fn open(path: &Path, config: Result<AppConfig, ConfigError>) -> Result<Workspace> {
    let config =
        config.with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(Workspace::open(config))
}
