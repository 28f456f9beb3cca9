//! Runs every loaded strategy over every symbol and persists one signal
//! table per symbol.

use chrono::NaiveDate;
use signals_core::error::{PipelineError, StrategyError};
use signals_core::traits::{SeriesStore, SignalStore, Strategy};
use signals_core::types::{Outcome, RunStatus, Series, Signal, SignalTable};
use signals_monitor::RunContext;
use signals_strategies::LoadedStrategies;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Evaluate one strategy, turning a panic into an error.
pub fn run_isolated(
    strategy: &dyn Strategy,
    series: &Series,
) -> Result<Vec<Signal>, StrategyError> {
    match panic::catch_unwind(AssertUnwindSafe(|| strategy.evaluate(series))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(StrategyError::Panicked(reason))
        }
    }
}

/// Outcome of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRun {
    pub symbol: String,
    pub outcome: Outcome,
    /// Rows persisted in the symbol's table
    pub rows: usize,
    /// Strategies that failed on this symbol
    pub failed_strategies: Vec<String>,
    pub message: String,
}

/// Per-symbol outcomes of one execution run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSummary {
    pub symbols: Vec<SymbolRun>,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.symbols.len()
    }

    /// Symbols that did not error (tables written or nothing to write).
    pub fn succeeded(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| s.outcome != Outcome::Error)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Symbols with a persisted table.
    pub fn written(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| s.outcome == Outcome::Ok)
            .count()
    }

    pub fn status(&self, date: NaiveDate) -> RunStatus {
        let message = format!(
            "{} of {} processed successfully",
            self.succeeded(),
            self.total()
        );
        if self.failed() > 0 {
            RunStatus::error(date, message)
        } else {
            RunStatus::ok(date, message)
        }
    }
}

/// Strategy execution engine.
pub struct ExecutionEngine<'a> {
    series: &'a dyn SeriesStore,
    signals: &'a dyn SignalStore,
}

impl<'a> ExecutionEngine<'a> {
    pub fn new(series: &'a dyn SeriesStore, signals: &'a dyn SignalStore) -> Self {
        Self { series, signals }
    }

    /// Run all strategies over all symbols.
    ///
    /// Previously persisted tables are cleared first, so the output always
    /// matches the current set of strategies. Only a failure to clear, to
    /// record the final status, or an empty strategy set aborts the run.
    pub fn run(
        &self,
        symbols: &[String],
        strategies: &LoadedStrategies,
        ctx: &RunContext<'_>,
    ) -> Result<ExecutionSummary, PipelineError> {
        if strategies.is_empty() {
            return Err(PipelineError::Bootstrap("no strategies loaded".into()));
        }

        self.signals.clear()?;
        tracing::info!(
            symbols = symbols.len(),
            strategies = ?strategies.ids(),
            "Executing strategies"
        );

        let mut summary = ExecutionSummary::default();
        for symbol in symbols {
            let started = Instant::now();
            let run = self.run_symbol(symbol, strategies, ctx);
            ctx.unit(symbol, run.outcome, &run.message, started);
            summary.symbols.push(run);
        }

        ctx.finish(&summary.status(ctx.date()))?;
        Ok(summary)
    }

    fn run_symbol(
        &self,
        symbol: &str,
        strategies: &LoadedStrategies,
        ctx: &RunContext<'_>,
    ) -> SymbolRun {
        let mut run = SymbolRun {
            symbol: symbol.to_string(),
            outcome: Outcome::Error,
            rows: 0,
            failed_strategies: Vec::new(),
            message: String::new(),
        };

        let series = match self.series.load(symbol) {
            Ok(Some(series)) => series,
            Ok(None) => {
                run.message = "no stored series".to_string();
                return run;
            }
            Err(e) => {
                run.message = format!("failed to load series: {e}");
                return run;
            }
        };

        let mut rows = Vec::new();
        for strategy in strategies.iter() {
            let started = Instant::now();
            match run_isolated(strategy, &series) {
                Ok(signals) => rows.extend(signals),
                Err(e) => {
                    let unit = format!("{symbol}/{}", strategy.id());
                    ctx.unit(&unit, Outcome::Error, &e.to_string(), started);
                    run.failed_strategies.push(strategy.id().to_string());
                }
            }
        }

        if rows.is_empty() {
            run.outcome = Outcome::Skip;
            run.message = "no signals produced".to_string();
            return run;
        }

        let table = SignalTable::new(symbol, rows);
        if let Err(e) = self.signals.save(&table) {
            run.message = format!("failed to save signals: {e}");
            return run;
        }

        run.outcome = Outcome::Ok;
        run.rows = table.len();
        run.message = if run.failed_strategies.is_empty() {
            format!("{} rows written", table.len())
        } else {
            format!(
                "{} rows written, failed: {}",
                table.len(),
                run.failed_strategies.join(", ")
            )
        };
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signals_core::types::{Bar, PriceField, SignalKind, StatusLevel};
    use signals_data::MemoryStore;
    use signals_monitor::MemoryStatus;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
    }

    fn series(symbol: &str, len: usize) -> Series {
        Series::from_bars(
            symbol,
            (0..len).map(|i| Bar::new(day(i), 10.0, 11.0, 9.0, 10.5, 100.0)),
        )
    }

    /// Buys every bar.
    struct Eager;

    impl Strategy for Eager {
        fn id(&self) -> &str {
            "eager"
        }
        fn lookback(&self) -> usize {
            1
        }
        fn required_fields(&self) -> &[PriceField] {
            &[PriceField::Close]
        }
        fn generate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError> {
            Ok(series
                .iter()
                .map(|b| Signal::new(b.date, SignalKind::Buy, "eager"))
                .collect())
        }
    }

    struct Exploding;

    impl Strategy for Exploding {
        fn id(&self) -> &str {
            "exploding"
        }
        fn lookback(&self) -> usize {
            1
        }
        fn required_fields(&self) -> &[PriceField] {
            &[]
        }
        fn generate(&self, _series: &Series) -> Result<Vec<Signal>, StrategyError> {
            panic!("index out of range")
        }
    }

    struct Failing;

    impl Strategy for Failing {
        fn id(&self) -> &str {
            "failing"
        }
        fn lookback(&self) -> usize {
            1
        }
        fn required_fields(&self) -> &[PriceField] {
            &[]
        }
        fn generate(&self, _series: &Series) -> Result<Vec<Signal>, StrategyError> {
            Err(StrategyError::Internal("bad state".into()))
        }
    }

    /// Returns nothing at all.
    struct Silent;

    impl Strategy for Silent {
        fn id(&self) -> &str {
            "silent"
        }
        fn lookback(&self) -> usize {
            1
        }
        fn required_fields(&self) -> &[PriceField] {
            &[]
        }
        fn generate(&self, _series: &Series) -> Result<Vec<Signal>, StrategyError> {
            Ok(Vec::new())
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_isolated_catches_panic() {
        let result = run_isolated(&Exploding, &series("AAPL", 3));
        assert!(matches!(result, Err(StrategyError::Panicked(m)) if m == "index out of range"));
    }

    #[test]
    fn test_failing_strategy_does_not_block_others() {
        let store = MemoryStore::new();
        store.put_series(series("AAPL", 5));
        let strategies = LoadedStrategies::from_strategies(vec![
            Box::new(Exploding),
            Box::new(Eager),
            Box::new(Failing),
        ]);
        let status = MemoryStatus::new();
        let ctx = RunContext::new("strategy_signals", day(5), &status);

        let summary = ExecutionEngine::new(&store, &store)
            .run(&symbols(&["AAPL"]), &strategies, &ctx)
            .unwrap();

        let run = &summary.symbols[0];
        assert_eq!(run.outcome, Outcome::Ok);
        assert_eq!(run.rows, 5);
        assert_eq!(run.failed_strategies, vec!["exploding", "failing"]);

        let table = store.table("AAPL").unwrap();
        assert_eq!(table.strategies(), vec!["eager"]);

        let failed_units: Vec<_> = status
            .units()
            .into_iter()
            .filter(|u| u.outcome == Outcome::Error)
            .map(|u| u.unit)
            .collect();
        assert_eq!(failed_units, vec!["AAPL/exploding", "AAPL/failing"]);
        assert_eq!(status.run("strategy_signals").unwrap().status, StatusLevel::Ok);
    }

    #[test]
    fn test_missing_series_counts_as_error() {
        let store = MemoryStore::new();
        store.put_series(series("AAPL", 5));
        store.put_series(series("NVDA", 5));
        let strategies = LoadedStrategies::from_strategies(vec![Box::new(Eager)]);
        let status = MemoryStatus::new();
        let ctx = RunContext::new("strategy_signals", day(5), &status);

        let summary = ExecutionEngine::new(&store, &store)
            .run(&symbols(&["AAPL", "MSFT", "NVDA"]), &strategies, &ctx)
            .unwrap();

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.symbols[1].outcome, Outcome::Error);
        assert!(store.table("NVDA").is_some());

        let run = status.run("strategy_signals").unwrap();
        assert_eq!(run.status, StatusLevel::Error);
        assert_eq!(run.message, "2 of 3 processed successfully");
    }

    #[test]
    fn test_stale_tables_are_cleared() {
        let store = MemoryStore::new();
        store.put_series(series("AAPL", 5));
        SignalStore::save(
            &store,
            &SignalTable::new("OLD", vec![Signal::hold(day(0), "retired")]),
        )
        .unwrap();
        let strategies = LoadedStrategies::from_strategies(vec![Box::new(Silent)]);
        let status = MemoryStatus::new();
        let ctx = RunContext::new("strategy_signals", day(5), &status);

        let summary = ExecutionEngine::new(&store, &store)
            .run(&symbols(&["AAPL"]), &strategies, &ctx)
            .unwrap();

        assert_eq!(summary.symbols[0].outcome, Outcome::Skip);
        assert!(SignalStore::symbols(&store).unwrap().is_empty());
    }

    #[test]
    fn test_hold_only_output_is_persisted() {
        // Too short for any lookback: every strategy degrades to holds
        let store = MemoryStore::new();
        store.put_series(series("AAPL", 3));
        let registry = signals_strategies::StrategyRegistry::new();
        let strategies = registry.discover(&signals_strategies::default_instances());
        let status = MemoryStatus::new();
        let ctx = RunContext::new("strategy_signals", day(3), &status);

        ExecutionEngine::new(&store, &store)
            .run(&symbols(&["AAPL"]), &strategies, &ctx)
            .unwrap();

        let table = store.table("AAPL").unwrap();
        assert_eq!(table.len(), 6);
        assert!(table.rows().iter().all(|s| s.kind == SignalKind::Hold));
    }

    #[test]
    fn test_no_strategies_is_fatal() {
        let store = MemoryStore::new();
        let status = MemoryStatus::new();
        let ctx = RunContext::new("strategy_signals", day(0), &status);

        let result = ExecutionEngine::new(&store, &store).run(
            &symbols(&["AAPL"]),
            &LoadedStrategies::default(),
            &ctx,
        );
        assert!(matches!(result, Err(PipelineError::Bootstrap(_))));
    }
}
