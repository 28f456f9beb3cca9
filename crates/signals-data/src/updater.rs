//! Historical store updater.
//!
//! Merges each symbol's newly fetched batch into its persisted series and
//! refreshes the recent window. By default a date, once stored, is never
//! rewritten (first write wins).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signals_core::error::{DataError, PipelineError};
use signals_core::traits::{BarFeed, SeriesStore};
use signals_core::types::{Bar, Outcome, RunStatus, Series, UpdateReport, DEFAULT_RECENT_WINDOW};
use signals_monitor::RunContext;
use std::collections::BTreeMap;
use std::time::Instant;

/// How a stored date reacts to an incoming bar for the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Stored values are kept; corrections from the feed are ignored.
    #[default]
    FirstWins,
    /// Incoming values replace stored values that differ.
    LastWins,
}

/// Result of merging a batch into a series.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub series: Series,
    pub rows_added: usize,
    pub rows_replaced: usize,
}

impl MergeOutcome {
    /// Nothing changed; the stored series need not be written.
    pub fn is_unchanged(&self) -> bool {
        self.rows_added == 0 && self.rows_replaced == 0
    }
}

/// Merge `incoming` into `stored`.
///
/// Duplicate dates inside `incoming` resolve to the first row encountered.
/// No stored date is ever dropped.
pub fn merge(
    symbol: &str,
    stored: Option<&Series>,
    incoming: Vec<Bar>,
    policy: MergePolicy,
) -> MergeOutcome {
    let mut by_date: BTreeMap<NaiveDate, Bar> = stored
        .map(|s| s.iter().map(|b| (b.date, *b)).collect())
        .unwrap_or_default();
    let (mut rows_added, mut rows_replaced) = (0, 0);

    for bar in Series::from_bars(symbol, incoming).into_bars() {
        match by_date.get_mut(&bar.date) {
            None => {
                by_date.insert(bar.date, bar);
                rows_added += 1;
            }
            Some(existing) if policy == MergePolicy::LastWins && existing.differs_from(&bar) => {
                *existing = bar;
                rows_replaced += 1;
            }
            Some(_) => {}
        }
    }

    MergeOutcome {
        series: Series::from_bars(symbol, by_date.into_values()),
        rows_added,
        rows_replaced,
    }
}

/// Updates persisted series from a bar feed.
pub struct Updater<'a> {
    store: &'a dyn SeriesStore,
    policy: MergePolicy,
    recent_window: usize,
}

impl<'a> Updater<'a> {
    pub fn new(store: &'a dyn SeriesStore) -> Self {
        Self {
            store,
            policy: MergePolicy::default(),
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_recent_window(mut self, length: usize) -> Self {
        self.recent_window = length;
        self
    }

    /// Merge one symbol's batch and persist the result.
    ///
    /// An empty batch is rejected. When nothing changes the report is a
    /// skip and neither the series nor its recent window is written.
    pub fn update(&self, symbol: &str, incoming: Vec<Bar>) -> Result<UpdateReport, DataError> {
        if incoming.is_empty() {
            return Err(DataError::EmptyBatch(symbol.to_string()));
        }

        let stored = self.store.load(symbol)?;
        let outcome = merge(symbol, stored.as_ref(), incoming, self.policy);
        if outcome.is_unchanged() {
            return Ok(UpdateReport::skip(symbol));
        }

        self.store.save(&outcome.series)?;
        self.store
            .save_recent(&outcome.series.recent_window(self.recent_window))?;

        let message = if outcome.rows_replaced > 0 {
            format!(
                "{} rows added, {} rows replaced",
                outcome.rows_added, outcome.rows_replaced
            )
        } else {
            format!("{} rows added", outcome.rows_added)
        };
        Ok(UpdateReport {
            symbol: symbol.to_string(),
            rows_added: outcome.rows_added,
            rows_replaced: outcome.rows_replaced,
            outcome: Outcome::Ok,
            message,
        })
    }

    /// Fetch and merge one symbol; any failure becomes an error report.
    pub fn try_update(&self, symbol: &str, feed: &dyn BarFeed) -> UpdateReport {
        feed.fetch(symbol)
            .and_then(|bars| self.update(symbol, bars))
            .unwrap_or_else(|e| UpdateReport::error(symbol, e.to_string()))
    }

    /// Update every symbol, record each outcome and the run status.
    pub fn run(
        &self,
        symbols: &[String],
        feed: &dyn BarFeed,
        ctx: &RunContext<'_>,
    ) -> Result<UpdateSummary, PipelineError> {
        tracing::info!(
            symbols = symbols.len(),
            feed = feed.name(),
            policy = ?self.policy,
            "Updating series"
        );

        let mut reports = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let started = Instant::now();
            let report = self.try_update(symbol, feed);
            ctx.unit(symbol, report.outcome, &report.message, started);
            reports.push(report);
        }

        let summary = UpdateSummary { reports };
        ctx.finish(&summary.status(ctx.date()))?;
        Ok(summary)
    }
}

/// Per-symbol reports of one update run.
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    pub reports: Vec<UpdateReport>,
}

impl UpdateSummary {
    fn count(&self, outcome: Outcome) -> usize {
        self.reports.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn updated(&self) -> usize {
        self.count(Outcome::Ok)
    }

    pub fn unchanged(&self) -> usize {
        self.count(Outcome::Skip)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Error)
    }

    pub fn rows_added(&self) -> usize {
        self.reports.iter().map(|r| r.rows_added).sum()
    }

    /// Terminal status: ERROR as soon as one symbol failed.
    pub fn status(&self, date: NaiveDate) -> RunStatus {
        let message = format!(
            "{} updated, {} unchanged, {} failed of {} symbols",
            self.updated(),
            self.unchanged(),
            self.failed(),
            self.reports.len()
        );
        if self.failed() > 0 {
            RunStatus::error(date, message)
        } else {
            RunStatus::ok(date, message)
        }
    }
}
