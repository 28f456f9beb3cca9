//! Opening gap strategy.
//!
//! Fades large opening gaps: sells a gap up and buys a gap down once the
//! relative gap clears both the threshold and an absolute floor.

use serde::{Deserialize, Serialize};
use signals_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{PriceField, Series, Signal, SignalKind},
};

/// Configuration for the gap strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GapOpenConfig {
    /// Relative gap that must be exceeded, e.g. 0.04 = 4%
    pub threshold: f64,
    /// Absolute floor on |gap|
    pub min_abs_gap: f64,
    /// Bars required before any signal is produced
    pub min_bars: usize,
    /// Sell only on a bearish body, buy only on a bullish body
    pub body_confirmation: bool,
    pub debug: bool,
}

impl Default for GapOpenConfig {
    fn default() -> Self {
        Self {
            threshold: 0.04,
            min_abs_gap: 0.015,
            min_bars: 10,
            body_confirmation: false,
            debug: false,
        }
    }
}

impl StrategyConfig for GapOpenConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if !(self.threshold >= 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Gap threshold must not be negative".into(),
            ));
        }
        if !(self.min_abs_gap >= 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Minimum absolute gap must not be negative".into(),
            ));
        }
        if self.min_bars < 2 {
            return Err(StrategyError::InvalidConfig(
                "At least 2 bars are needed to measure a gap".into(),
            ));
        }
        Ok(())
    }
}

const REQUIRED_FIELDS: [PriceField; 4] = [
    PriceField::Open,
    PriceField::High,
    PriceField::Low,
    PriceField::Close,
];

/// Opening gap strategy.
pub struct GapOpenStrategy {
    id: String,
    config: GapOpenConfig,
}

impl GapOpenStrategy {
    /// Create a new gap strategy emitting signals under `id`.
    pub fn new(id: impl Into<String>, config: GapOpenConfig) -> Self {
        Self {
            id: id.into(),
            config,
        }
    }

    pub fn config(&self) -> &GapOpenConfig {
        &self.config
    }
}

impl Strategy for GapOpenStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Sells large gaps up and buys large gaps down at the open"
    }

    fn lookback(&self) -> usize {
        self.config.min_bars
    }

    fn required_fields(&self) -> &[PriceField] {
        &REQUIRED_FIELDS
    }

    fn generate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError> {
        let cfg = &self.config;
        let bars = series.bars();
        let (mut buys, mut sells) = (0usize, 0usize);

        let signals = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let prev_close = i.checked_sub(1).map(|p| bars[p].close);
                let gap = match prev_close {
                    Some(pc) if pc != 0.0 && pc.is_finite() => Some((bar.open - pc) / pc),
                    _ => None,
                };

                let kind = match gap {
                    Some(g) => {
                        let sufficient = g.abs() >= cfg.min_abs_gap;
                        let bearish = !cfg.body_confirmation || bar.is_bearish();
                        let bullish = !cfg.body_confirmation || bar.is_bullish();
                        if g > cfg.threshold && sufficient && bearish {
                            sells += 1;
                            SignalKind::Sell
                        } else if g < -cfg.threshold && sufficient && bullish {
                            buys += 1;
                            SignalKind::Buy
                        } else {
                            SignalKind::Hold
                        }
                    }
                    None => SignalKind::Hold,
                };

                let mut signal = Signal::new(bar.date, kind, self.id.as_str());
                if cfg.debug {
                    if let (Some(pc), Some(g)) = (prev_close, gap) {
                        signal = signal
                            .with_diagnostic("prev_close", pc)
                            .with_diagnostic("gap", g)
                            .with_diagnostic("gap_abs", g.abs());
                    }
                }
                signal
            })
            .collect();

        tracing::debug!(
            strategy = %self.id,
            symbol = series.symbol(),
            buys,
            sells,
            "gap evaluated"
        );
        Ok(signals)
    }
}
