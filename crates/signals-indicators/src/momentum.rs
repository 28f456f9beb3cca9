//! Momentum indicators.

use signals_core::traits::Indicator;

/// Relative Strength Index (RSI).
///
/// Gains and losses are averaged with a simple rolling mean over the last
/// `period` price changes (Cutler's variant), not Wilder's smoothing. The
/// first value sits at index `period`. A window with no movement at all has
/// no value; a window without losses reads 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let period_f64 = self.period as f64;

        for (i, window) in changes.windows(self.period).enumerate() {
            let gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period_f64;
            let loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period_f64;

            result[i + self.period] = if loss == 0.0 {
                (gain > 0.0).then_some(100.0)
            } else {
                Some(100.0 - 100.0 / (1.0 + gain / loss))
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_alignment() {
        let rsi = Rsi::new(3);
        let result = rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[..3].iter().all(Option::is_none));
        assert_eq!(result[3], Some(100.0));
        assert_eq!(rsi.period(), 4);
    }

    #[test]
    fn test_rsi_mixed_changes() {
        // changes: +2, -1, +1, -2
        let result = Rsi::new(4).calculate(&[10.0, 12.0, 11.0, 12.0, 10.0]);

        // gain 3/4, loss 3/4
        assert!((result[4].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_only_losses() {
        let result = Rsi::new(2).calculate(&[5.0, 4.0, 3.0]);
        assert_eq!(result[2], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_window_has_no_value() {
        let result = Rsi::new(3).calculate(&[7.0; 6]);
        assert!(result.iter().all(Option::is_none));
    }
}
