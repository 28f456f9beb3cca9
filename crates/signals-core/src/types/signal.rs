//! Signals and per-symbol signal tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::Series;

/// Classification a strategy assigns to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "buy",
            SignalKind::Sell => "sell",
            SignalKind::Hold => "hold",
        }
    }

    /// Buy and sell are votes; hold is "no opinion".
    #[inline]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalKind::Hold)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(SignalKind::Buy),
            "sell" => Ok(SignalKind::Sell),
            "hold" => Ok(SignalKind::Hold),
            other => Err(format!("unknown signal classification: {other}")),
        }
    }
}

/// One strategy's classification of one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Date being classified
    pub date: NaiveDate,
    /// Classification
    pub kind: SignalKind,
    /// Id of the strategy that produced the signal
    pub strategy: String,
    /// Optional named diagnostic values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub diagnostics: BTreeMap<String, f64>,
}

impl Signal {
    /// Create a signal without diagnostics.
    pub fn new(date: NaiveDate, kind: SignalKind, strategy: impl Into<String>) -> Self {
        Self {
            date,
            kind,
            strategy: strategy.into(),
            diagnostics: BTreeMap::new(),
        }
    }

    /// Create a hold signal.
    pub fn hold(date: NaiveDate, strategy: impl Into<String>) -> Self {
        Self::new(date, SignalKind::Hold, strategy)
    }

    /// Attach a diagnostic value.
    pub fn with_diagnostic(mut self, name: impl Into<String>, value: f64) -> Self {
        self.diagnostics.insert(name.into(), value);
        self
    }
}

/// Uniform hold classification over every date of `series`.
///
/// This is the shape a strategy returns when it cannot form an opinion.
pub fn hold_sequence(series: &Series, strategy: &str) -> Vec<Signal> {
    series
        .iter()
        .map(|bar| Signal::hold(bar.date, strategy))
        .collect()
}

/// All signals of one run for one symbol, across strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    symbol: String,
    rows: Vec<Signal>,
}

impl SignalTable {
    /// Build a table; rows are stably ordered by date.
    pub fn new(symbol: impl Into<String>, mut rows: Vec<Signal>) -> Self {
        rows.sort_by_key(|s| s.date);
        Self {
            symbol: symbol.into(),
            rows,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[Signal] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent date present in the table.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|s| s.date).max()
    }

    /// Rows dated at [`SignalTable::as_of`].
    pub fn latest(&self) -> impl Iterator<Item = &Signal> {
        let as_of = self.as_of();
        self.rows.iter().filter(move |s| Some(s.date) == as_of)
    }

    /// Distinct strategy ids present, sorted.
    pub fn strategies(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.iter().map(|s| s.strategy.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_signal_kind_parsing() {
        assert_eq!("BUY".parse::<SignalKind>().unwrap(), SignalKind::Buy);
        assert_eq!(" sell ".parse::<SignalKind>().unwrap(), SignalKind::Sell);
        assert!("maybe".parse::<SignalKind>().is_err());
        assert!(!SignalKind::Hold.is_actionable());
    }

    #[test]
    fn test_hold_sequence_covers_every_date() {
        let series = Series::from_bars(
            "AAPL",
            (1..=4).map(|d| Bar::new(day(d), 1.0, 1.0, 1.0, 1.0, 1.0)),
        );

        let holds = hold_sequence(&series, "gap_open");
        assert_eq!(holds.len(), 4);
        assert!(holds.iter().all(|s| s.kind == SignalKind::Hold));
        assert!(holds.iter().all(|s| s.strategy == "gap_open"));
        assert_eq!(
            holds.iter().map(|s| s.date).collect::<Vec<_>>(),
            series.dates()
        );
    }

    #[test]
    fn test_table_latest_rows() {
        let table = SignalTable::new(
            "AAPL",
            vec![
                Signal::new(day(5), SignalKind::Buy, "b"),
                Signal::new(day(2), SignalKind::Sell, "a"),
                Signal::new(day(5), SignalKind::Hold, "a"),
            ],
        );

        assert_eq!(table.rows()[0].date, day(2));
        assert_eq!(table.as_of(), Some(day(5)));
        assert_eq!(table.latest().count(), 2);
        assert_eq!(table.strategies(), vec!["a", "b"]);
    }
}
