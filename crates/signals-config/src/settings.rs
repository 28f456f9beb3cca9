//! Configuration structures.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use signals_core::types::DEFAULT_RECENT_WINDOW;
use signals_data::MergePolicy;
use signals_strategies::{default_instances, StrategySpec};
use std::path::{Path, PathBuf};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub updater: UpdaterConfig,
    /// Configured strategy instances, in execution order
    #[serde(default = "default_instances")]
    pub strategies: Vec<StrategySpec>,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            roster: RosterConfig::default(),
            updater: UpdaterConfig::default(),
            strategies: default_instances(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.updater.recent_window == 0 {
            return Err(ConfigError::Invalid(
                "updater.recent_window must be at least 1".into(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one strategy instance must be configured".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "signals".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily rolling log files; console only when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

/// Storage layout. Relative paths are resolved against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub historic: PathBuf,
    pub recent: PathBuf,
    pub signals: PathBuf,
    /// Daily feature snapshot table
    pub features: PathBuf,
    /// Drop folder the feed writes incoming batches to
    pub inbox: PathBuf,
    /// Spool folder for outgoing reports
    pub outbox: PathBuf,
    pub status_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            historic: PathBuf::from("historic"),
            recent: PathBuf::from("recent"),
            signals: PathBuf::from("signals"),
            features: PathBuf::from("features/features_day.csv"),
            inbox: PathBuf::from("inbox"),
            outbox: PathBuf::from("outbox"),
            status_file: PathBuf::from("status/status.json"),
        }
    }
}

impl StorageConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn historic_dir(&self) -> PathBuf {
        self.resolve(&self.historic)
    }

    pub fn recent_dir(&self) -> PathBuf {
        self.resolve(&self.recent)
    }

    pub fn signals_dir(&self) -> PathBuf {
        self.resolve(&self.signals)
    }

    pub fn features_path(&self) -> PathBuf {
        self.resolve(&self.features)
    }

    pub fn inbox_dir(&self) -> PathBuf {
        self.resolve(&self.inbox)
    }

    pub fn outbox_dir(&self) -> PathBuf {
        self.resolve(&self.outbox)
    }

    pub fn status_path(&self) -> PathBuf {
        self.resolve(&self.status_file)
    }
}

/// Where the symbol roster lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub path: PathBuf,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/symbol_groups.json"),
        }
    }
}

/// Historical store updater settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    pub recent_window: usize,
    pub merge_policy: MergePolicy,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
            merge_policy: MergePolicy::default(),
        }
    }
}

/// Which notifier carries the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    /// Spool to the outbox directory
    #[default]
    Outbox,
    /// Log only
    Log,
}

/// Daily report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub subject_prefix: String,
    pub html: bool,
    pub notifier: NotifierKind,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recipient: None,
            sender: None,
            subject_prefix: "Heuristic signals of the day".to_string(),
            html: true,
            notifier: NotifierKind::default(),
        }
    }
}
