//! CSV-backed series store.

use signals_core::error::DataError;
use signals_core::traits::SeriesStore;
use signals_core::types::{Bar, RecentWindow, Series};
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical series under `historic_dir`, recent windows under `recent_dir`,
/// one `<SYMBOL>.csv` per symbol in each.
pub struct CsvSeriesStore {
    historic_dir: PathBuf,
    recent_dir: PathBuf,
}

impl CsvSeriesStore {
    pub fn new(historic_dir: impl Into<PathBuf>, recent_dir: impl Into<PathBuf>) -> Self {
        Self {
            historic_dir: historic_dir.into(),
            recent_dir: recent_dir.into(),
        }
    }

    pub fn historic_path(&self, symbol: &str) -> PathBuf {
        self.historic_dir.join(format!("{symbol}.csv"))
    }

    pub fn recent_path(&self, symbol: &str) -> PathBuf {
        self.recent_dir.join(format!("{symbol}.csv"))
    }
}

impl SeriesStore for CsvSeriesStore {
    fn load(&self, symbol: &str) -> Result<Option<Series>, DataError> {
        let path = self.historic_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let bars = read_bar_file(&path)?;
        Ok(Some(Series::from_bars(symbol, bars)))
    }

    fn save(&self, series: &Series) -> Result<(), DataError> {
        write_bar_file(&self.historic_path(series.symbol()), series.bars())
    }

    fn save_recent(&self, window: &RecentWindow) -> Result<(), DataError> {
        write_bar_file(&self.recent_path(window.symbol()), window.bars())
    }

    fn load_recent(&self, symbol: &str) -> Result<Option<Vec<Bar>>, DataError> {
        let path = self.recent_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        read_bar_file(&path).map(Some)
    }
}

fn read_bar_file(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::Storage(format!("{}: {e}", path.display())))?;
    reader
        .deserialize()
        .collect::<Result<Vec<Bar>, _>>()
        .map_err(|e| DataError::ParseError(format!("{}: {e}", path.display())))
}

/// Write through a temporary file so a failed write never leaves a
/// truncated series behind.
fn write_bar_file(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("csv.tmp");

    let mut writer =
        csv::Writer::from_path(&tmp).map_err(|e| DataError::Storage(e.to_string()))?;
    for bar in bars {
        writer
            .serialize(bar)
            .map_err(|e| DataError::Storage(e.to_string()))?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp, path)?;
    Ok(())
}
