//! Per-run logging and status context.

use chrono::{NaiveDate, Utc};
use signals_core::error::StatusError;
use signals_core::traits::StatusRecorder;
use signals_core::types::{Outcome, RunStatus, UnitReport};
use std::time::Instant;
use uuid::Uuid;

/// Context for one stage invocation.
///
/// Built once per run and handed to each component so unit records and the
/// terminal status all carry the same module name and run id.
pub struct RunContext<'a> {
    run_id: Uuid,
    module: String,
    date: NaiveDate,
    started: Instant,
    recorder: &'a dyn StatusRecorder,
}

impl<'a> RunContext<'a> {
    pub fn new(
        module: impl Into<String>,
        date: NaiveDate,
        recorder: &'a dyn StatusRecorder,
    ) -> Self {
        let ctx = Self {
            run_id: Uuid::new_v4(),
            module: module.into(),
            date,
            started: Instant::now(),
            recorder,
        };
        tracing::info!(run_id = %ctx.run_id, module = %ctx.module, date = %date, "Run started");
        ctx
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Run date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Record one unit of work that began at `started`.
    ///
    /// A ledger failure is logged and swallowed so it never changes the
    /// unit's own outcome.
    pub fn unit(&self, unit: &str, outcome: Outcome, message: &str, started: Instant) {
        let elapsed = started.elapsed();
        let report = UnitReport {
            timestamp: Utc::now(),
            module: self.module.clone(),
            unit: unit.to_string(),
            outcome,
            message: message.to_string(),
            elapsed,
        };

        match outcome {
            Outcome::Error => tracing::warn!(
                run_id = %self.run_id,
                unit,
                outcome = %outcome,
                elapsed_ms = elapsed.as_millis() as u64,
                "{message}"
            ),
            _ => tracing::info!(
                run_id = %self.run_id,
                unit,
                outcome = %outcome,
                elapsed_ms = elapsed.as_millis() as u64,
                "{message}"
            ),
        }

        if let Err(e) = self.recorder.record_unit(&report) {
            tracing::warn!(run_id = %self.run_id, unit, error = %e, "Failed to record unit");
        }
    }

    /// Write the stage's terminal status.
    pub fn finish(&self, status: &RunStatus) -> Result<(), StatusError> {
        tracing::info!(
            run_id = %self.run_id,
            module = %self.module,
            status = %status.status,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "{}",
            status.message
        );
        self.recorder.record_run(&self.module, status)
    }
}
