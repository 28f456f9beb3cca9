//! CSV-backed signal-table store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signals_core::error::DataError;
use signals_core::traits::SignalStore;
use signals_core::types::{Signal, SignalKind, SignalTable};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const SUFFIX: &str = "_signals.csv";

/// Stored row; diagnostics are kept as a JSON object in one column.
#[derive(Debug, Serialize, Deserialize)]
struct SignalRow {
    date: NaiveDate,
    symbol: String,
    signal: SignalKind,
    strategy: String,
    #[serde(default)]
    diagnostics: String,
}

/// One `<SYMBOL>_signals.csv` per symbol under a single directory.
pub struct CsvSignalStore {
    dir: PathBuf,
}

impl CsvSignalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}{SUFFIX}"))
    }

    fn table_files(&self) -> Result<Vec<(String, PathBuf)>, DataError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let symbol = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(SUFFIX))
                .map(str::to_string);
            if let Some(symbol) = symbol {
                files.push((symbol, path));
            }
        }
        Ok(files)
    }
}

impl SignalStore for CsvSignalStore {
    fn clear(&self) -> Result<(), DataError> {
        let files = self.table_files()?;
        for (_, path) in &files {
            fs::remove_file(path)?;
        }
        tracing::debug!(dir = %self.dir.display(), removed = files.len(), "Cleared signal tables");
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn save(&self, table: &SignalTable) -> Result<(), DataError> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = csv::Writer::from_path(self.path_for(table.symbol()))
            .map_err(|e| DataError::Storage(e.to_string()))?;

        for signal in table.rows() {
            let diagnostics = if signal.diagnostics.is_empty() {
                String::new()
            } else {
                serde_json::to_string(&signal.diagnostics)
                    .map_err(|e| DataError::Storage(e.to_string()))?
            };
            writer
                .serialize(SignalRow {
                    date: signal.date,
                    symbol: table.symbol().to_string(),
                    signal: signal.kind,
                    strategy: signal.strategy.clone(),
                    diagnostics,
                })
                .map_err(|e| DataError::Storage(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols: Vec<String> = self.table_files()?.into_iter().map(|(s, _)| s).collect();
        symbols.sort();
        Ok(symbols)
    }

    fn load(&self, symbol: &str) -> Result<SignalTable, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| DataError::Storage(e.to_string()))?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: SignalRow = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let diagnostics: BTreeMap<String, f64> = if row.diagnostics.is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&row.diagnostics)
                    .map_err(|e| DataError::ParseError(e.to_string()))?
            };
            rows.push(Signal {
                date: row.date,
                kind: row.signal,
                strategy: row.strategy,
                diagnostics,
            });
        }

        Ok(SignalTable::new(symbol, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_save_and_load_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSignalStore::new(dir.path());
        let table = SignalTable::new(
            "AAPL",
            vec![
                Signal::new(day(3), SignalKind::Buy, "bollinger_breakout")
                    .with_diagnostic("upper_band", 101.25),
                Signal::hold(day(2), "bollinger_breakout"),
                Signal::new(day(3), SignalKind::Sell, "gap_open"),
            ],
        );

        store.save(&table).unwrap();
        let loaded = store.load("AAPL").unwrap();

        assert_eq!(loaded, table);
        assert_eq!(loaded.rows()[1].diagnostics["upper_band"], 101.25);
    }

    #[test]
    fn test_clear_removes_only_tables() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSignalStore::new(dir.path());
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        for symbol in ["MSFT", "AAPL"] {
            store
                .save(&SignalTable::new(symbol, vec![Signal::hold(day(2), "gap_open")]))
                .unwrap();
        }
        assert_eq!(store.symbols().unwrap(), vec!["AAPL", "MSFT"]);

        store.clear().unwrap();

        assert!(store.symbols().unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_clear_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSignalStore::new(dir.path().join("signals"));

        store.clear().unwrap();
        assert!(dir.path().join("signals").is_dir());
    }

    #[test]
    fn test_load_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvSignalStore::new(dir.path());
        assert!(matches!(store.load("AAPL"), Err(DataError::SymbolNotFound(_))));
    }
}
