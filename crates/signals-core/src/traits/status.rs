//! Status ledger capability.

use crate::error::StatusError;
use crate::types::{RunStatus, UnitReport};

/// Receives per-unit records and each stage's terminal status.
///
/// Implementations own any concurrency safety; the pipeline assumes runs
/// against the same ledger are serialized externally.
pub trait StatusRecorder {
    /// Record the outcome and timing of one unit of work.
    fn record_unit(&self, unit: &UnitReport) -> Result<(), StatusError>;

    /// Overwrite the ledger entry for `module` (last write wins).
    fn record_run(&self, module: &str, status: &RunStatus) -> Result<(), StatusError>;
}
