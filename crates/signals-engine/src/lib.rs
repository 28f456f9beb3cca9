//! Strategy execution engine.

mod engine;

pub use engine::{run_isolated, ExecutionEngine, ExecutionSummary, SymbolRun};
