//! Configuration management.

mod roster;
mod settings;

pub use roster::{load_roster, parse_roster};
pub use settings::{
    AppConfig, AppSettings, LoggingConfig, NotifierKind, ReportConfig, RosterConfig,
    StorageConfig, UpdaterConfig,
};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Configuration and roster errors. All of them are fatal at bootstrap.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read roster {path}: {source}")]
    RosterIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed roster: {0}")]
    Roster(String),
}

/// Load configuration from file and environment.
///
/// `SIGNALS__<SECTION>__<KEY>` variables override the file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SIGNALS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
