//! Daily feature snapshot.
//!
//! Reads each symbol's persisted recent window and reduces it to one row of
//! indicator values at its latest date. All rows go to a single CSV table.

mod builder;
mod snapshot;

pub use builder::{write_snapshot, FeatureBuilder, FeatureSummary, SymbolFeatures};
pub use snapshot::{compute_features, FeatureRow, MIN_HISTORY};
