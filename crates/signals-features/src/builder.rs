//! Feature snapshot stage.

use crate::snapshot::{compute_features, FeatureRow, MIN_HISTORY};
use chrono::NaiveDate;
use signals_core::error::{DataError, PipelineError};
use signals_core::traits::SeriesStore;
use signals_core::types::{Outcome, RunStatus, Series};
use signals_monitor::RunContext;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Outcome of one symbol in a feature run.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFeatures {
    pub symbol: String,
    pub outcome: Outcome,
    pub message: String,
    pub row: Option<FeatureRow>,
}

impl SymbolFeatures {
    fn skip(symbol: &str, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            outcome: Outcome::Skip,
            message: message.into(),
            row: None,
        }
    }
}

/// Builds the daily snapshot from persisted recent windows.
pub struct FeatureBuilder<'a> {
    series: &'a dyn SeriesStore,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(series: &'a dyn SeriesStore) -> Self {
        Self { series }
    }

    /// Compute every symbol's row, write the snapshot table to `output`
    /// and record the run status.
    ///
    /// The table is rewritten on every run, header only when no symbol had
    /// enough history.
    pub fn run(
        &self,
        symbols: &[String],
        output: &Path,
        ctx: &RunContext<'_>,
    ) -> Result<FeatureSummary, PipelineError> {
        tracing::info!(symbols = symbols.len(), output = %output.display(), "Building features");

        let mut summary = FeatureSummary::default();
        for symbol in symbols {
            let started = Instant::now();
            let features = self.build_symbol(symbol);
            ctx.unit(symbol, features.outcome, &features.message, started);
            summary.symbols.push(features);
        }

        write_snapshot(output, summary.rows())?;
        ctx.finish(&summary.status(ctx.date()))?;
        Ok(summary)
    }

    fn build_symbol(&self, symbol: &str) -> SymbolFeatures {
        let bars = match self.series.load_recent(symbol) {
            Ok(Some(bars)) => bars,
            Ok(None) => return SymbolFeatures::skip(symbol, "no recent window"),
            Err(e) => {
                return SymbolFeatures {
                    symbol: symbol.to_string(),
                    outcome: Outcome::Error,
                    message: format!("failed to load recent window: {e}"),
                    row: None,
                };
            }
        };

        let window = Series::from_bars(symbol, bars);
        match compute_features(symbol, window.bars()) {
            Some(row) => SymbolFeatures {
                symbol: symbol.to_string(),
                outcome: Outcome::Ok,
                message: format!("features as of {}", row.date),
                row: Some(row),
            },
            None => SymbolFeatures::skip(
                symbol,
                format!("{} rows, fewer than {MIN_HISTORY}", window.len()),
            ),
        }
    }
}

/// Per-symbol outcomes of one feature run.
#[derive(Debug, Clone, Default)]
pub struct FeatureSummary {
    pub symbols: Vec<SymbolFeatures>,
}

impl FeatureSummary {
    fn count(&self, outcome: Outcome) -> usize {
        self.symbols.iter().filter(|s| s.outcome == outcome).count()
    }

    /// Snapshot rows in symbol order of the run.
    pub fn rows(&self) -> impl Iterator<Item = &FeatureRow> {
        self.symbols.iter().filter_map(|s| s.row.as_ref())
    }

    pub fn built(&self) -> usize {
        self.count(Outcome::Ok)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skip)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Error)
    }

    /// Terminal status: ERROR as soon as one symbol failed.
    pub fn status(&self, date: NaiveDate) -> RunStatus {
        let message = format!(
            "{} of {} symbols with features, {} skipped, {} failed",
            self.built(),
            self.symbols.len(),
            self.skipped(),
            self.failed()
        );
        if self.failed() > 0 {
            RunStatus::error(date, message)
        } else {
            RunStatus::ok(date, message)
        }
    }
}

/// Write the snapshot table through a temporary file.
pub fn write_snapshot<'r>(
    path: &Path,
    rows: impl IntoIterator<Item = &'r FeatureRow>,
) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("csv.tmp");

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp)
        .map_err(|e| DataError::Storage(e.to_string()))?;
    writer
        .write_record(FeatureRow::COLUMNS)
        .map_err(|e| DataError::Storage(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| DataError::Storage(e.to_string()))?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signals_core::types::{Bar, RecentWindow, StatusLevel};
    use signals_data::MemoryStore;
    use signals_monitor::MemoryStatus;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
    }

    fn seed_recent(store: &MemoryStore, symbol: &str, len: usize) {
        let series = Series::from_bars(
            symbol,
            (0..len).map(|i| {
                let close = 20.0 + i as f64;
                Bar::new(day(i), close, close + 1.0, close - 1.0, close, 500.0)
            }),
        );
        store.save_recent(&series.recent_window(len)).unwrap();
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn read_table(path: &Path) -> (Vec<String>, Vec<FeatureRow>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader.deserialize().collect::<Result<_, _>>().unwrap();
        (headers, rows)
    }

    /// Series store whose recent windows cannot be read.
    struct Unreadable;

    impl SeriesStore for Unreadable {
        fn load(&self, _symbol: &str) -> Result<Option<Series>, DataError> {
            Ok(None)
        }
        fn save(&self, _series: &Series) -> Result<(), DataError> {
            Ok(())
        }
        fn save_recent(&self, _window: &RecentWindow) -> Result<(), DataError> {
            Ok(())
        }
        fn load_recent(&self, symbol: &str) -> Result<Option<Vec<Bar>>, DataError> {
            Err(DataError::Storage(format!("{symbol}: corrupt file")))
        }
    }

    #[test]
    fn test_snapshot_rows_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("features/features_day.csv");
        let store = MemoryStore::new();
        seed_recent(&store, "AAPL", 60);
        seed_recent(&store, "MSFT", 59);
        let status = MemoryStatus::new();
        let ctx = RunContext::new("features", day(60), &status);

        let summary = FeatureBuilder::new(&store)
            .run(&symbols(&["AAPL", "MSFT", "NOPE"]), &output, &ctx)
            .unwrap();

        assert_eq!(summary.built(), 1);
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.symbols[1].message, "59 rows, fewer than 60");
        assert_eq!(summary.symbols[2].message, "no recent window");

        let (headers, rows) = read_table(&output);
        assert_eq!(headers, FeatureRow::COLUMNS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].date, day(59));
        assert_eq!(rows[0].volume, Some(500.0));

        let run = status.run("features").unwrap();
        assert_eq!(run.status, StatusLevel::Ok);
        assert_eq!(run.message, "1 of 3 symbols with features, 2 skipped, 0 failed");
    }

    #[test]
    fn test_empty_snapshot_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("features_day.csv");
        let store = MemoryStore::new();
        seed_recent(&store, "AAPL", 10);
        let status = MemoryStatus::new();
        let ctx = RunContext::new("features", day(10), &status);

        FeatureBuilder::new(&store)
            .run(&symbols(&["AAPL"]), &output, &ctx)
            .unwrap();

        let (headers, rows) = read_table(&output);
        assert_eq!(headers, FeatureRow::COLUMNS);
        assert!(rows.is_empty());
        assert!(!output.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_unreadable_window_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("features_day.csv");
        let status = MemoryStatus::new();
        let ctx = RunContext::new("features", day(0), &status);

        let summary = FeatureBuilder::new(&Unreadable)
            .run(&symbols(&["AAPL"]), &output, &ctx)
            .unwrap();

        assert_eq!(summary.failed(), 1);
        assert_eq!(status.units()[0].outcome, Outcome::Error);
        assert_eq!(status.run("features").unwrap().status, StatusLevel::Error);
    }
}
