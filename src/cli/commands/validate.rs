//! Validate configuration command.

use anyhow::Result;
use signals_config::{load_roster, AppConfig, ConfigError};
use signals_strategies::StrategyRegistry;
use std::path::Path;

pub fn run(config_path: &Path, config: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let loaded = StrategyRegistry::new().discover(&config.strategies);
    for (id, error) in loaded.failures() {
        println!("Strategy '{}' invalid: {}", id, error);
    }
    if loaded.is_empty() {
        anyhow::bail!("No strategy instance could be built");
    }

    match load_roster(&config.roster.path) {
        Ok(symbols) => println!("Roster: {} symbols", symbols.len()),
        Err(e) => {
            println!("Roster error: {}", e);
            return Err(e.into());
        }
    }

    println!("Configuration is valid!");
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
