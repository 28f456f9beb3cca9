//! In-memory store and feed.

use signals_core::error::DataError;
use signals_core::traits::{BarFeed, SeriesStore, SignalStore};
use signals_core::types::{Bar, RecentWindow, Series, SignalTable};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Simple in-memory store, usable as series store, signal store and feed.
#[derive(Default)]
pub struct MemoryStore {
    series: RefCell<HashMap<String, Series>>,
    recent: RefCell<HashMap<String, RecentWindow>>,
    tables: RefCell<BTreeMap<String, SignalTable>>,
    batches: HashMap<String, Vec<Bar>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored series.
    pub fn put_series(&self, series: Series) {
        self.series
            .borrow_mut()
            .insert(series.symbol().to_string(), series);
    }

    /// Queue the batch the feed returns for a symbol.
    pub fn put_batch(&mut self, symbol: &str, bars: Vec<Bar>) {
        self.batches.insert(symbol.to_string(), bars);
    }

    pub fn series(&self, symbol: &str) -> Option<Series> {
        self.series.borrow().get(symbol).cloned()
    }

    pub fn recent(&self, symbol: &str) -> Option<RecentWindow> {
        self.recent.borrow().get(symbol).cloned()
    }

    pub fn table(&self, symbol: &str) -> Option<SignalTable> {
        self.tables.borrow().get(symbol).cloned()
    }

    /// Number of series writes so far.
    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl SeriesStore for MemoryStore {
    fn load(&self, symbol: &str) -> Result<Option<Series>, DataError> {
        Ok(self.series(symbol))
    }

    fn save(&self, series: &Series) -> Result<(), DataError> {
        *self.writes.borrow_mut() += 1;
        self.put_series(series.clone());
        Ok(())
    }

    fn save_recent(&self, window: &RecentWindow) -> Result<(), DataError> {
        self.recent
            .borrow_mut()
            .insert(window.symbol().to_string(), window.clone());
        Ok(())
    }

    fn load_recent(&self, symbol: &str) -> Result<Option<Vec<Bar>>, DataError> {
        Ok(self.recent(symbol).map(|window| window.bars().to_vec()))
    }
}

impl SignalStore for MemoryStore {
    fn clear(&self) -> Result<(), DataError> {
        self.tables.borrow_mut().clear();
        Ok(())
    }

    fn save(&self, table: &SignalTable) -> Result<(), DataError> {
        self.tables
            .borrow_mut()
            .insert(table.symbol().to_string(), table.clone());
        Ok(())
    }

    fn symbols(&self) -> Result<Vec<String>, DataError> {
        Ok(self.tables.borrow().keys().cloned().collect())
    }

    fn load(&self, symbol: &str) -> Result<SignalTable, DataError> {
        self.table(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }
}

impl BarFeed for MemoryStore {
    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        self.batches
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
