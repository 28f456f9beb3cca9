//! File-backed status ledger.

use serde::Serialize;
use signals_core::error::StatusError;
use signals_core::traits::StatusRecorder;
use signals_core::types::{RunStatus, UnitReport};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One line of the per-day unit log.
#[derive(Debug, Serialize)]
struct UnitRow<'a> {
    timestamp: String,
    module: &'a str,
    unit: &'a str,
    outcome: &'a str,
    elapsed_ms: u128,
    message: &'a str,
}

/// JSON document keyed by module name plus a CSV unit log per day.
///
/// Every `record_run` is a read-modify-write of the whole document with no
/// locking; callers must not run two stages against the same ledger at once.
pub struct JsonStatusLedger {
    path: PathBuf,
}

impl JsonStatusLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current ledger contents; empty when the file does not exist yet.
    pub fn entries(&self) -> Result<BTreeMap<String, RunStatus>, StatusError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StatusError::Serialization(e.to_string()))
    }

    /// Unit log file for the day of `unit`.
    pub fn unit_log_path(&self, unit: &UnitReport) -> PathBuf {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("units-{}.csv", unit.timestamp.format("%Y-%m-%d")))
    }

    fn ensure_parent(&self) -> Result<(), StatusError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl StatusRecorder for JsonStatusLedger {
    fn record_unit(&self, unit: &UnitReport) -> Result<(), StatusError> {
        self.ensure_parent()?;
        let path = self.unit_log_path(unit);
        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer
            .serialize(UnitRow {
                timestamp: unit.timestamp.to_rfc3339(),
                module: &unit.module,
                unit: &unit.unit,
                outcome: unit.outcome.as_str(),
                elapsed_ms: unit.elapsed.as_millis(),
                message: &unit.message,
            })
            .map_err(|e| StatusError::Serialization(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn record_run(&self, module: &str, status: &RunStatus) -> Result<(), StatusError> {
        self.ensure_parent()?;
        let mut entries = self.entries()?;
        entries.insert(module.to_string(), status.clone());

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StatusError::Serialization(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
