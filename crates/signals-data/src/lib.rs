//! Series storage, signal-table storage, bar feeds and the historical store
//! updater.

mod csv_source;
mod csv_store;
mod memory;
mod signal_store;
mod updater;

pub use csv_source::{load_bars, parse_date, read_bars, CsvDropFeed};
pub use csv_store::CsvSeriesStore;
pub use memory::MemoryStore;
pub use signal_store::CsvSignalStore;
pub use updater::{merge, MergeOutcome, MergePolicy, UpdateSummary, Updater};
