//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of trailing dates kept in a [`RecentWindow`].
pub const DEFAULT_RECENT_WINDOW: usize = 60;

/// One daily OHLCV record.
///
/// Bars are immutable once produced by the feed. A field the feed did not
/// supply is carried as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the bar's body size (absolute difference between open and close).
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Read one price field.
    #[inline]
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        }
    }

    /// Check whether any value differs from `other` (same date assumed).
    pub fn differs_from(&self, other: &Bar) -> bool {
        PriceField::ALL
            .iter()
            .any(|&f| self.field(f).to_bits() != other.field(f).to_bits())
    }
}

/// Named numeric column of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full price history of one symbol.
///
/// Bars are kept in ascending date order and no two bars share a date.
/// Every constructor enforces this, so consumers can rely on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Create a new empty series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from bars in any order.
    ///
    /// Bars are stably sorted by date and, for a repeated date, the first
    /// bar encountered is kept.
    pub fn from_bars(symbol: impl Into<String>, bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut bars: Vec<Bar> = bars.into_iter().collect();
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Consume the series, returning its bars.
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    /// Get the first (oldest) bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Get the last (newest) bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the bar stored for a date.
    pub fn bar_on(&self, date: NaiveDate) -> Option<&Bar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// Check whether a date is present.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.bar_on(date).is_some()
    }

    /// All dates, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Extract one field as a vector.
    pub fn column(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().map(|b| b.field(field)).collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.column(PriceField::Close)
    }

    /// Extract open prices as a vector.
    pub fn opens(&self) -> Vec<f64> {
        self.column(PriceField::Open)
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.column(PriceField::High)
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.column(PriceField::Low)
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.column(PriceField::Volume)
    }

    /// A field is present when every bar carries a finite value for it.
    pub fn has_field(&self, field: PriceField) -> bool {
        self.bars.iter().all(|b| b.field(field).is_finite())
    }

    /// Fields from `required` that this series lacks.
    pub fn missing_fields(&self, required: &[PriceField]) -> Vec<PriceField> {
        required
            .iter()
            .copied()
            .filter(|&f| !self.has_field(f))
            .collect()
    }

    /// Project the latest `length` dates.
    pub fn recent_window(&self, length: usize) -> RecentWindow {
        let start = self.bars.len().saturating_sub(length);
        RecentWindow {
            symbol: self.symbol.clone(),
            length,
            bars: self.bars[start..].to_vec(),
        }
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

/// Bounded read-only suffix of a [`Series`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWindow {
    symbol: String,
    length: usize,
    bars: Vec<Bar>,
}

impl RecentWindow {
    /// Symbol this window belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Configured maximum number of dates.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bars in the window, ascending.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars actually held.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(day(1), 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.range() - 15.0).abs() < 0.001);
        assert!((bar.body() - 5.0).abs() < 0.001);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(day(1), 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.true_range(None) - 15.0).abs() < 0.001);
        // Previous close below the low widens the range
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_series_sorts_and_keeps_first_duplicate() {
        let series = Series::from_bars(
            "AAPL",
            vec![
                Bar::new(day(3), 1.0, 1.0, 1.0, 3.0, 1.0),
                Bar::new(day(1), 1.0, 1.0, 1.0, 1.0, 1.0),
                Bar::new(day(3), 1.0, 1.0, 1.0, 99.0, 1.0),
                Bar::new(day(2), 1.0, 1.0, 1.0, 2.0, 1.0),
            ],
        );

        assert_eq!(series.dates(), vec![day(1), day(2), day(3)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.bar_on(day(3)).unwrap().close, 3.0);
        assert!(series.bar_on(day(4)).is_none());
    }

    #[test]
    fn test_recent_window_takes_latest_dates() {
        let series = Series::from_bars(
            "MSFT",
            (1..=10).map(|d| Bar::new(day(d), 1.0, 1.0, 1.0, d as f64, 1.0)),
        );

        let window = series.recent_window(3);
        assert_eq!(window.len(), 3);
        assert_eq!(window.bars()[0].date, day(8));
        assert_eq!(window.bars()[2].date, day(10));

        let wide = series.recent_window(60);
        assert_eq!(wide.len(), 10);
        assert_eq!(wide.length(), 60);
    }

    #[test]
    fn test_missing_fields() {
        let series = Series::from_bars(
            "X",
            vec![
                Bar::new(day(1), 1.0, 2.0, 0.5, 1.5, f64::NAN),
                Bar::new(day(2), 1.0, 2.0, 0.5, 1.5, f64::NAN),
            ],
        );

        assert!(series.has_field(PriceField::Close));
        assert!(!series.has_field(PriceField::Volume));
        assert_eq!(
            series.missing_fields(&[PriceField::Open, PriceField::Volume]),
            vec![PriceField::Volume]
        );
    }
}
