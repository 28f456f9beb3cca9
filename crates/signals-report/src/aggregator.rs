//! Signal aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use signals_core::error::PipelineError;
use signals_core::traits::{SeriesStore, SignalStore};
use signals_core::types::{Outcome, SignalKind, SignalTable};
use signals_monitor::RunContext;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

/// Close price at the as-of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Price {
    /// Rounded to 2 decimals
    Available(Decimal),
    NotAvailable,
}

impl Price {
    /// Convert a stored close; NaN, infinities and unrepresentable values
    /// are not available.
    pub fn from_close(close: f64) -> Self {
        if !close.is_finite() {
            return Price::NotAvailable;
        }
        Decimal::try_from(close)
            .map(|d| Price::Available(d.round_dp(2)))
            .unwrap_or(Price::NotAvailable)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Available(d) => write!(f, "{:.2}", d),
            Price::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// One symbol of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub close: Price,
    /// Strategy ids voting buy, sorted and unique
    pub buy: Vec<String>,
    /// Strategy ids voting sell, sorted and unique
    pub sell: Vec<String>,
}

/// Collapse a table to the actionable votes at its as-of date.
///
/// `None` when the table is empty or holds no buy/sell row on that date.
fn latest_votes(table: &SignalTable) -> Option<(NaiveDate, Vec<String>, Vec<String>)> {
    let as_of = table.as_of()?;
    let mut buy = BTreeSet::new();
    let mut sell = BTreeSet::new();

    for signal in table.latest() {
        match signal.kind {
            SignalKind::Buy => {
                buy.insert(signal.strategy.clone());
            }
            SignalKind::Sell => {
                sell.insert(signal.strategy.clone());
            }
            SignalKind::Hold => {}
        }
    }

    if buy.is_empty() && sell.is_empty() {
        return None;
    }
    Some((as_of, buy.into_iter().collect(), sell.into_iter().collect()))
}

/// All qualifying symbols, sorted by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    rows: Vec<AggregateRow>,
}

impl Aggregate {
    /// Build from rows in any order.
    pub fn new(mut rows: Vec<AggregateRow>) -> Self {
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Self { rows }
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total buy votes across symbols.
    pub fn buy_votes(&self) -> usize {
        self.rows.iter().map(|r| r.buy.len()).sum()
    }

    /// Total sell votes across symbols.
    pub fn sell_votes(&self) -> usize {
        self.rows.iter().map(|r| r.sell.len()).sum()
    }

    /// Latest as-of date across symbols.
    pub fn latest_as_of(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.as_of).max()
    }
}

/// Reads every persisted signal table and builds the [`Aggregate`].
pub struct Aggregator<'a> {
    signals: &'a dyn SignalStore,
    series: &'a dyn SeriesStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(signals: &'a dyn SignalStore, series: &'a dyn SeriesStore) -> Self {
        Self { signals, series }
    }

    /// Aggregate all tables. A table that cannot be read is recorded as an
    /// error unit and left out.
    pub fn aggregate(&self, ctx: &RunContext<'_>) -> Result<Aggregate, PipelineError> {
        let symbols = self.signals.symbols()?;
        let mut rows = Vec::new();

        for symbol in &symbols {
            let started = Instant::now();
            let table = match self.signals.load(symbol) {
                Ok(table) => table,
                Err(e) => {
                    let message = format!("failed to read signals: {e}");
                    ctx.unit(symbol, Outcome::Error, &message, started);
                    continue;
                }
            };

            if let Some((as_of, buy, sell)) = latest_votes(&table) {
                let close = self.close_on(symbol, as_of);
                rows.push(AggregateRow {
                    symbol: symbol.clone(),
                    as_of,
                    close,
                    buy,
                    sell,
                });
            }
        }

        let aggregate = Aggregate::new(rows);
        tracing::info!(
            tables = symbols.len(),
            symbols = aggregate.len(),
            buy_votes = aggregate.buy_votes(),
            sell_votes = aggregate.sell_votes(),
            "Signals aggregated"
        );
        Ok(aggregate)
    }

    fn close_on(&self, symbol: &str, date: NaiveDate) -> Price {
        match self.series.load(symbol) {
            Ok(Some(series)) => series
                .bar_on(date)
                .map(|bar| Price::from_close(bar.close))
                .unwrap_or(Price::NotAvailable),
            Ok(None) => Price::NotAvailable,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "Close lookup failed");
                Price::NotAvailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use signals_core::types::{Bar, Series, Signal};
    use signals_data::MemoryStore;
    use signals_monitor::MemoryStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn save(store: &MemoryStore, symbol: &str, rows: Vec<Signal>) {
        SignalStore::save(store, &SignalTable::new(symbol, rows)).unwrap();
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(Price::from_close(187.456).to_string(), "187.46");
        assert_eq!(Price::from_close(12.0).to_string(), "12.00");
        assert_eq!(Price::from_close(f64::NAN), Price::NotAvailable);
        assert_eq!(Price::NotAvailable.to_string(), "N/A");
    }

    #[test]
    fn test_votes_at_as_of_date() {
        // X: buy from A and B at the latest date, sell from A on an older date
        // Y: only holds at its latest date
        let store = MemoryStore::new();
        save(
            &store,
            "X",
            vec![
                Signal::new(day(3), SignalKind::Sell, "A"),
                Signal::new(day(5), SignalKind::Buy, "B"),
                Signal::new(day(5), SignalKind::Buy, "A"),
                Signal::new(day(5), SignalKind::Buy, "A"),
            ],
        );
        save(
            &store,
            "Y",
            vec![
                Signal::new(day(4), SignalKind::Sell, "A"),
                Signal::hold(day(5), "A"),
            ],
        );
        store.put_series(Series::from_bars(
            "X",
            vec![Bar::new(day(5), 10.0, 11.0, 9.0, 10.126, 100.0)],
        ));

        let status = MemoryStatus::new();
        let ctx = RunContext::new("alerts", day(5), &status);
        let aggregate = Aggregator::new(&store, &store).aggregate(&ctx).unwrap();

        assert_eq!(aggregate.len(), 1);
        let row = &aggregate.rows()[0];
        assert_eq!(row.symbol, "X");
        assert_eq!(row.as_of, day(5));
        assert_eq!(row.buy, vec!["A", "B"]);
        assert!(row.sell.is_empty());
        assert_eq!(row.close, Price::Available(dec!(10.13)));
        assert_eq!(aggregate.buy_votes(), 2);
        assert_eq!(aggregate.sell_votes(), 0);
    }

    #[test]
    fn test_as_of_is_per_symbol() {
        let store = MemoryStore::new();
        save(&store, "ZED", vec![Signal::new(day(2), SignalKind::Sell, "gap_open")]);
        save(&store, "ABC", vec![Signal::new(day(6), SignalKind::Buy, "gap_open")]);

        let status = MemoryStatus::new();
        let ctx = RunContext::new("alerts", day(6), &status);
        let aggregate = Aggregator::new(&store, &store).aggregate(&ctx).unwrap();

        let symbols: Vec<_> = aggregate.rows().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ABC", "ZED"]);
        assert_eq!(aggregate.rows()[1].as_of, day(2));
        // No stored series: close is not available
        assert_eq!(aggregate.rows()[0].close, Price::NotAvailable);
        assert_eq!(aggregate.latest_as_of(), Some(day(6)));
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let build = |order: &[&str]| {
            let store = MemoryStore::new();
            for symbol in order {
                save(
                    &store,
                    symbol,
                    vec![
                        Signal::new(day(1), SignalKind::Sell, "z_strategy"),
                        Signal::new(day(1), SignalKind::Sell, "a_strategy"),
                    ],
                );
            }
            let status = MemoryStatus::new();
            let ctx = RunContext::new("alerts", day(1), &status);
            Aggregator::new(&store, &store).aggregate(&ctx).unwrap()
        };

        let first = build(&["MSFT", "AAPL"]);
        assert_eq!(first, build(&["AAPL", "MSFT"]));
        assert_eq!(first.rows()[0].sell, vec!["a_strategy", "z_strategy"]);
    }
}
