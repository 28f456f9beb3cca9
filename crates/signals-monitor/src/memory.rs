//! In-memory status recorder.

use signals_core::error::StatusError;
use signals_core::traits::StatusRecorder;
use signals_core::types::{RunStatus, UnitReport};
use std::cell::RefCell;
use std::collections::HashMap;

/// Status recorder that keeps everything in memory.
#[derive(Default)]
pub struct MemoryStatus {
    units: RefCell<Vec<UnitReport>>,
    runs: RefCell<HashMap<String, RunStatus>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All unit records, in arrival order.
    pub fn units(&self) -> Vec<UnitReport> {
        self.units.borrow().clone()
    }

    /// Latest status written for a module.
    pub fn run(&self, module: &str) -> Option<RunStatus> {
        self.runs.borrow().get(module).cloned()
    }
}

impl StatusRecorder for MemoryStatus {
    fn record_unit(&self, unit: &UnitReport) -> Result<(), StatusError> {
        self.units.borrow_mut().push(unit.clone());
        Ok(())
    }

    fn record_run(&self, module: &str, status: &RunStatus) -> Result<(), StatusError> {
        self.runs
            .borrow_mut()
            .insert(module.to_string(), status.clone());
        Ok(())
    }
}
