//! Logging, per-run context and status ledger implementations.

mod context;
mod ledger;
mod logging;
mod memory;

pub use context::RunContext;
pub use ledger::JsonStatusLedger;
pub use logging::setup_logging;
pub use memory::MemoryStatus;
