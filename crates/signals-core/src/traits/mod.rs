//! Core traits for the signal pipeline.

mod indicator;
mod notifier;
mod status;
mod storage;
mod strategy;

pub use indicator::Indicator;
pub use notifier::{Message, Notifier};
pub use status::StatusRecorder;
pub use storage::{BarFeed, SeriesStore, SignalStore};
pub use strategy::{Strategy, StrategyConfig};
