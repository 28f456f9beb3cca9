//! Heuristic signal strategies.
//!
//! This crate provides the built-in strategy kinds and the registry that
//! turns configured instances into runnable strategies:
//! - Bollinger breakout with body, volume and ATR filters
//! - Opening gap reversal

mod bollinger_breakout;
mod gap_open;
mod registry;

pub use bollinger_breakout::{BollingerBreakoutStrategy, BreakoutConfig};
pub use gap_open::{GapOpenConfig, GapOpenStrategy};
pub use registry::{
    default_instances, LoadedStrategies, StrategyFactory, StrategyInfo, StrategyRegistry,
    StrategySpec,
};
