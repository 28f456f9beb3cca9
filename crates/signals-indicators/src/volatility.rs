//! Volatility indicators.

use signals_core::traits::Indicator;
use statrs::statistics::Statistics;

/// Rolling sample standard deviation (n - 1 denominator).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        // Recomputed per window; a running sum of squares drifts on long series.
        for (i, window) in data.windows(self.period).enumerate() {
            result[i + self.period - 1] = Some(window.iter().std_dev());
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Average True Range (ATR).
///
/// The first true range is the bar's own high-low range. The first ATR value
/// sits at index `period - 1` and is the mean of the first `period` true
/// ranges; later values use Wilder's smoothing.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate ATR from OHLC data.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        let len = high.len().min(low.len()).min(close.len());
        let mut result = vec![None; len];
        if len < self.period {
            return result;
        }

        let tr: Vec<f64> = (0..len)
            .map(|i| {
                let high_low = high[i] - low[i];
                if i == 0 {
                    return high_low;
                }
                let high_close = (high[i] - close[i - 1]).abs();
                let low_close = (low[i] - close[i - 1]).abs();
                high_low.max(high_close).max(low_close)
            })
            .collect();

        let period_f64 = self.period as f64;
        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / period_f64;
        result[self.period - 1] = Some(atr);

        for i in self.period..len {
            atr = (atr * (period_f64 - 1.0) + tr[i]) / period_f64;
            result[i] = Some(atr);
        }

        result
    }
}
