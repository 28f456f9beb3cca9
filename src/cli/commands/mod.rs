//! CLI command implementations.

pub mod aggregate;
pub mod execute;
pub mod features;
pub mod pipeline;
pub mod strategies;
pub mod update;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use signals_config::{load_roster, AppConfig};
use signals_core::types::RunStatus;
use signals_data::{CsvSeriesStore, CsvSignalStore};
use signals_monitor::{JsonStatusLedger, RunContext};

/// Stores and ledger resolved from the configuration.
pub struct Workspace {
    pub config: AppConfig,
    pub ledger: JsonStatusLedger,
    pub series: CsvSeriesStore,
    pub signals: CsvSignalStore,
}

impl Workspace {
    pub fn open(config: AppConfig) -> Self {
        let storage = &config.storage;
        let ledger = JsonStatusLedger::new(storage.status_path());
        let series = CsvSeriesStore::new(storage.historic_dir(), storage.recent_dir());
        let signals = CsvSignalStore::new(storage.signals_dir());
        Self {
            config,
            ledger,
            series,
            signals,
        }
    }

    /// Symbols to process: the explicit list when given, the roster otherwise.
    pub fn symbols(&self, explicit: &[String], ctx: &RunContext<'_>) -> Result<Vec<String>> {
        if !explicit.is_empty() {
            let mut symbols = explicit.to_vec();
            symbols.sort();
            symbols.dedup();
            return Ok(symbols);
        }
        load_roster(&self.config.roster.path)
            .map_err(|e| abort(ctx, e))
            .with_context(|| format!("Roster {}", self.config.roster.path.display()))
    }
}

/// Run date of a stage.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Record a bootstrap failure as the stage's terminal status and turn it
/// into an error for `main`.
pub fn abort(ctx: &RunContext<'_>, error: impl std::fmt::Display) -> anyhow::Error {
    let message = error.to_string();
    if let Err(e) = ctx.finish(&RunStatus::error(ctx.date(), message.as_str())) {
        tracing::error!(error = %e, "Failed to record run status");
    }
    anyhow::anyhow!(message)
}
