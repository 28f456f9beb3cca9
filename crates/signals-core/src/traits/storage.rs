//! Storage and feed collaborator traits.

use crate::error::DataError;
use crate::types::{Bar, RecentWindow, Series, SignalTable};

/// One addressable blob per symbol holding its canonical series.
pub trait SeriesStore {
    /// Load a symbol's series; `Ok(None)` when nothing is stored yet.
    fn load(&self, symbol: &str) -> Result<Option<Series>, DataError>;

    /// Persist the full series, replacing what was stored.
    fn save(&self, series: &Series) -> Result<(), DataError>;

    /// Persist the recent-window projection of a series.
    fn save_recent(&self, window: &RecentWindow) -> Result<(), DataError>;

    /// Load the persisted recent window; `Ok(None)` when none was written.
    fn load_recent(&self, symbol: &str) -> Result<Option<Vec<Bar>>, DataError>;
}

/// One addressable blob per symbol per run holding its signal table.
pub trait SignalStore {
    /// Remove every persisted table.
    fn clear(&self) -> Result<(), DataError>;

    /// Persist a table, replacing any table stored for the same symbol.
    fn save(&self, table: &SignalTable) -> Result<(), DataError>;

    /// Symbols that currently have a table, sorted.
    fn symbols(&self) -> Result<Vec<String>, DataError>;

    /// Load one symbol's table.
    fn load(&self, symbol: &str) -> Result<SignalTable, DataError>;
}

/// Source of newly arrived bars.
pub trait BarFeed {
    /// Latest batch for a symbol, in whatever order the feed delivers it.
    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;

    /// Get the feed name.
    fn name(&self) -> &str;
}
