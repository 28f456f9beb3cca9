//! Feature computation for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signals_core::traits::Indicator;
use signals_core::types::Bar;
use signals_indicators::{Rsi, Sma, StdDev};

/// Bars spanned by the low/high range feature.
const RANGE_WINDOW: usize = 60;

/// Minimum number of bars needed for a snapshot row.
pub const MIN_HISTORY: usize = RANGE_WINDOW;

/// Indicator values of one symbol at its latest date.
///
/// A value that is undefined or non-finite is left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub ma_5: Option<f64>,
    pub ma_20: Option<f64>,
    pub rsi_14: Option<f64>,
    /// Close within the 60-bar low/high range, 0 at the low and 1 at the high
    pub range_position_60: Option<f64>,
    /// Sample std-dev of the last 20 closes
    pub volatility_20: Option<f64>,
    pub change_1d: Option<f64>,
    pub change_3d: Option<f64>,
    pub volume: Option<f64>,
}

impl FeatureRow {
    /// Column order of the snapshot table.
    pub const COLUMNS: [&'static str; 10] = [
        "symbol",
        "date",
        "ma_5",
        "ma_20",
        "rsi_14",
        "range_position_60",
        "volatility_20",
        "change_1d",
        "change_3d",
        "volume",
    ];
}

/// Compute the snapshot row for ascending `bars`.
///
/// Returns `None` when fewer than [`MIN_HISTORY`] bars are available.
pub fn compute_features(symbol: &str, bars: &[Bar]) -> Option<FeatureRow> {
    if bars.len() < MIN_HISTORY {
        return None;
    }
    let last = bars.last()?;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    Some(FeatureRow {
        symbol: symbol.to_string(),
        date: last.date,
        ma_5: latest(&Sma::new(5), &closes),
        ma_20: latest(&Sma::new(20), &closes),
        rsi_14: latest(&Rsi::new(14), &closes),
        range_position_60: range_position(&bars[bars.len() - RANGE_WINDOW..]),
        volatility_20: latest(&StdDev::new(20), &closes),
        change_1d: change(&closes, 1),
        change_3d: change(&closes, 3),
        volume: finite(last.volume),
    })
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn latest(indicator: &dyn Indicator, data: &[f64]) -> Option<f64> {
    indicator.calculate(data).last().copied().flatten().and_then(finite)
}

fn range_position(window: &[Bar]) -> Option<f64> {
    let close = window.last()?.close;
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;
    if span.is_nan() || span <= 0.0 {
        return None;
    }
    finite((close - low) / span)
}

/// Fractional change of the last close over the close `periods` bars before.
fn change(closes: &[f64], periods: usize) -> Option<f64> {
    let last = *closes.last()?;
    let previous = *closes.get(closes.len().checked_sub(periods + 1)?)?;
    if previous == 0.0 {
        return None;
    }
    finite(last / previous - 1.0)
}
