//! Windowed technical indicators.
//!
//! Every indicator is an explicit pass over an ordered slice and returns a
//! vector aligned with its input:
//! - Moving averages (SMA via running sum)
//! - Momentum (RSI over rolling mean gains and losses)
//! - Volatility (rolling sample standard deviation, Wilder ATR)

pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use momentum::Rsi;
pub use moving_average::Sma;
pub use volatility::{Atr, StdDev};

/// Element-wise ratio of two aligned series, `None` where either side is
/// missing or the denominator is zero.
pub fn ratio(numerator: &[Option<f64>], denominator: &[f64]) -> Vec<Option<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, &d)| match n {
            Some(n) if d != 0.0 => Some(n / d),
            _ => None,
        })
        .collect()
}
