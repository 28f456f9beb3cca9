//! Core data types for the signal pipeline.

mod ohlcv;
mod signal;
mod status;

pub use ohlcv::{Bar, PriceField, RecentWindow, Series, DEFAULT_RECENT_WINDOW};
pub use signal::{hold_sequence, Signal, SignalKind, SignalTable};
pub use status::{Outcome, RunStatus, StatusLevel, UnitReport, UpdateReport};
