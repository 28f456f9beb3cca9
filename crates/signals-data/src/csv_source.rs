//! CSV drop-folder bar feed.
//!
//! The upstream ingest job leaves one CSV per symbol in an inbox directory;
//! this feed reads those files.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use signals_core::error::DataError;
use signals_core::traits::BarFeed;
use signals_core::types::Bar;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Header names accepted as the date column.
const DATE_COLUMNS: [&str; 6] = ["date", "Date", "datetime", "Datetime", "timestamp", "Timestamp"];

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "datetime",
        alias = "Datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// Bar feed reading `<inbox>/<SYMBOL>.csv`.
pub struct CsvDropFeed {
    inbox: PathBuf,
}

impl CsvDropFeed {
    /// Create a new feed over an inbox directory.
    pub fn new(inbox: impl Into<PathBuf>) -> Self {
        Self {
            inbox: inbox.into(),
        }
    }

    /// Path of a symbol's drop file.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.inbox.join(format!("{symbol}.csv"))
    }
}

impl BarFeed for CsvDropFeed {
    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(format!(
                "{symbol} (no feed file at {})",
                path.display()
            )));
        }
        load_bars(&path, symbol)
    }

    fn name(&self) -> &str {
        "csv-drop"
    }
}

/// Load a batch of bars from a CSV file.
pub fn load_bars(path: &Path, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path)?;
    read_bars(file, symbol)
}

/// Parse a batch of bars from CSV text.
///
/// A batch without a date column, or with any unparsable row, is rejected
/// as a whole.
pub fn read_bars<R: Read>(source: R, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?;
    if !headers.iter().any(|h| DATE_COLUMNS.contains(&h)) {
        return Err(DataError::MissingDateField(symbol.to_string()));
    }

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        bars.push(Bar::new(
            parse_date(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume.unwrap_or(f64::NAN),
        ));
    }

    Ok(bars)
}

/// Parse the date formats the feed has been seen to deliver.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
