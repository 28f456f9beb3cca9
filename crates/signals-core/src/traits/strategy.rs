//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{hold_sequence, PriceField, Series, Signal};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy trait.
///
/// A strategy is a pure function of a series: it borrows the series
/// read-only and returns a fresh sequence of dated signals. Parameters are
/// bound when the strategy is constructed.
pub trait Strategy: Send + Sync {
    /// Id stamped on every signal this strategy emits.
    fn id(&self) -> &str;

    /// Number of bars needed before the strategy can form an opinion.
    fn lookback(&self) -> usize;

    /// Fields the strategy reads.
    fn required_fields(&self) -> &[PriceField];

    /// Compute signals for a series that satisfies the lookback and field
    /// requirements. Callers should go through [`Strategy::evaluate`].
    fn generate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError>;

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }

    /// Check if enough bars are available.
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.lookback()
    }

    /// Run the strategy, degrading to a uniform hold sequence when the
    /// series is too short or lacks a required field.
    fn evaluate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError> {
        if !self.is_warmed_up(series.len()) {
            tracing::debug!(
                strategy = self.id(),
                symbol = series.symbol(),
                bars = series.len(),
                lookback = self.lookback(),
                "insufficient history, returning hold"
            );
            return Ok(hold_sequence(series, self.id()));
        }

        let missing = series.missing_fields(self.required_fields());
        if !missing.is_empty() {
            tracing::warn!(
                strategy = self.id(),
                symbol = series.symbol(),
                missing = ?missing,
                "missing fields, returning hold"
            );
            return Ok(hold_sequence(series, self.id()));
        }

        self.generate(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, SignalKind};
    use chrono::NaiveDate;

    struct AlwaysBuy {
        lookback: usize,
    }

    impl Strategy for AlwaysBuy {
        fn id(&self) -> &str {
            "always_buy"
        }

        fn lookback(&self) -> usize {
            self.lookback
        }

        fn required_fields(&self) -> &[PriceField] {
            &[PriceField::Close, PriceField::Volume]
        }

        fn generate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError> {
            Ok(series
                .iter()
                .map(|b| Signal::new(b.date, SignalKind::Buy, self.id()))
                .collect())
        }
    }

    fn series(len: u32, volume: f64) -> Series {
        Series::from_bars(
            "TEST",
            (1..=len).map(|d| {
                Bar::new(
                    NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    1.0,
                    1.0,
                    1.0,
                    1.0,
                    volume,
                )
            }),
        )
    }

    #[test]
    fn test_strategy_warmup() {
        let strategy = AlwaysBuy { lookback: 20 };

        assert!(!strategy.is_warmed_up(10));
        assert!(!strategy.is_warmed_up(19));
        assert!(strategy.is_warmed_up(20));
        assert!(strategy.is_warmed_up(100));
    }

    #[test]
    fn test_evaluate_degrades_to_hold_on_short_series() {
        let strategy = AlwaysBuy { lookback: 5 };
        let signals = strategy.evaluate(&series(3, 1.0)).unwrap();

        assert_eq!(signals.len(), 3);
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));
        assert!(signals.iter().all(|s| s.strategy == "always_buy"));
    }

    #[test]
    fn test_evaluate_degrades_to_hold_on_missing_field() {
        let strategy = AlwaysBuy { lookback: 2 };
        let signals = strategy.evaluate(&series(4, f64::NAN)).unwrap();

        assert_eq!(signals.len(), 4);
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));
    }

    #[test]
    fn test_evaluate_runs_when_ready() {
        let strategy = AlwaysBuy { lookback: 2 };
        let signals = strategy.evaluate(&series(4, 1.0)).unwrap();

        assert!(signals.iter().all(|s| s.kind == SignalKind::Buy));
    }
}
