//! Bollinger breakout strategy.
//!
//! Buys when the close breaks above the upper Bollinger band and every
//! enabled confirmation filter passes. Never emits sell.

use serde::{Deserialize, Serialize};
use signals_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{PriceField, Series, Signal, SignalKind},
};
use signals_indicators::{ratio, Atr, Sma, StdDev};

/// Configuration for the Bollinger breakout strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    /// Rolling window for the mean, standard deviation and volume average
    pub window: usize,
    /// Standard deviation multiplier for the upper band
    pub std_multiplier: f64,
    /// Scale the band by volume / rolling mean volume
    pub volume_adjusted: bool,
    /// Require body / range above `body_ratio`
    pub body_filter: bool,
    pub body_ratio: f64,
    /// Require volume above rolling mean volume times `volume_multiplier`
    pub volume_filter: bool,
    pub volume_multiplier: f64,
    /// ATR period for the volatility filter
    pub atr_period: usize,
    /// Minimum ATR / close; this filter is always on
    pub atr_threshold: f64,
    /// Attach diagnostic values to every signal
    pub debug: bool,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            window: 20,
            std_multiplier: 2.5,
            volume_adjusted: false,
            body_filter: true,
            body_ratio: 0.5,
            volume_filter: true,
            volume_multiplier: 1.05,
            atr_period: 14,
            atr_threshold: 0.008,
            debug: false,
        }
    }
}

impl StrategyConfig for BreakoutConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.window < 2 {
            return Err(StrategyError::InvalidConfig(
                "Window must be at least 2".into(),
            ));
        }
        if !(self.std_multiplier > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Std multiplier must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.body_ratio) {
            return Err(StrategyError::InvalidConfig(
                "Body ratio must be between 0 and 1".into(),
            ));
        }
        if !(self.volume_multiplier > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Volume multiplier must be positive".into(),
            ));
        }
        if self.atr_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "ATR period must be at least 1".into(),
            ));
        }
        if !(self.atr_threshold >= 0.0) {
            return Err(StrategyError::InvalidConfig(
                "ATR threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}

const REQUIRED_FIELDS: [PriceField; 5] = [
    PriceField::Open,
    PriceField::High,
    PriceField::Low,
    PriceField::Close,
    PriceField::Volume,
];

/// Bollinger breakout strategy.
pub struct BollingerBreakoutStrategy {
    id: String,
    config: BreakoutConfig,
}

impl BollingerBreakoutStrategy {
    /// Create a new breakout strategy emitting signals under `id`.
    pub fn new(id: impl Into<String>, config: BreakoutConfig) -> Self {
        Self {
            id: id.into(),
            config,
        }
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }
}

impl Strategy for BollingerBreakoutStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Buys closes above the upper Bollinger band confirmed by body, volume and ATR filters"
    }

    fn lookback(&self) -> usize {
        self.config.window.max(self.config.atr_period)
    }

    fn required_fields(&self) -> &[PriceField] {
        &REQUIRED_FIELDS
    }

    fn generate(&self, series: &Series) -> Result<Vec<Signal>, StrategyError> {
        let cfg = &self.config;
        let closes = series.closes();
        let volumes = series.volumes();

        // One pass per distinct window; the volume mean serves both the band
        // scaling and the volume filter.
        let mean = Sma::new(cfg.window).calculate(&closes);
        let std = StdDev::new(cfg.window).calculate(&closes);
        let volume_mean = if cfg.volume_adjusted || cfg.volume_filter {
            Sma::new(cfg.window).calculate(&volumes)
        } else {
            vec![None; volumes.len()]
        };
        let atr = Atr::new(cfg.atr_period).calculate_ohlc(&series.highs(), &series.lows(), &closes);
        let atr_ratio = ratio(&atr, &closes);

        let mut buys = 0usize;
        let signals = series
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let mut upper = match (mean[i], std[i]) {
                    (Some(m), Some(s)) => Some(m + cfg.std_multiplier * s),
                    _ => None,
                };
                if cfg.volume_adjusted {
                    upper = match (upper, volume_mean[i]) {
                        (Some(u), Some(vm)) if vm != 0.0 => Some(u * bar.volume / vm),
                        _ => None,
                    };
                }

                // NaN (flat bar) compares false, so a zero range never passes.
                let body_ok = bar.body() / bar.range() > cfg.body_ratio;
                let volume_ok =
                    volume_mean[i].is_some_and(|vm| bar.volume > vm * cfg.volume_multiplier);
                let atr_ok = atr_ratio[i].is_some_and(|r| r > cfg.atr_threshold);

                let mut breakout = upper.is_some_and(|u| bar.close > u);
                if cfg.body_filter {
                    breakout &= body_ok;
                }
                if cfg.volume_filter {
                    breakout &= volume_ok;
                }
                breakout &= atr_ok;

                let kind = if breakout {
                    buys += 1;
                    SignalKind::Buy
                } else {
                    SignalKind::Hold
                };

                let mut signal = Signal::new(bar.date, kind, self.id.as_str());
                if cfg.debug {
                    let flag = |b: bool| if b { 1.0 } else { 0.0 };
                    for (name, value) in [
                        ("mean", mean[i]),
                        ("upper_band", upper),
                        ("atr", atr[i]),
                        ("atr_ratio", atr_ratio[i]),
                    ] {
                        if let Some(v) = value.filter(|v| v.is_finite()) {
                            signal = signal.with_diagnostic(name, v);
                        }
                    }
                    signal = signal.with_diagnostic("breakout", flag(breakout));
                    if cfg.body_filter {
                        signal = signal.with_diagnostic("body_ok", flag(body_ok));
                    }
                    if cfg.volume_filter {
                        signal = signal.with_diagnostic("volume_ok", flag(volume_ok));
                    }
                }
                signal
            })
            .collect();

        tracing::debug!(strategy = %self.id, symbol = series.symbol(), buys, "breakout evaluated");
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use signals_core::types::Bar;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
    }

    /// 24 quiet bars followed by one wide bullish bar on heavy volume.
    fn breakout_series(last_open: f64, last_volume: f64) -> Series {
        let mut bars: Vec<Bar> = (0..24)
            .map(|i| Bar::new(day(i), 100.0, 101.0, 99.0, 100.0, 1000.0))
            .collect();
        bars.push(Bar::new(day(24), last_open, 111.0, 99.0, 110.0, last_volume));
        Series::from_bars("TEST", bars)
    }

    fn strategy(config: BreakoutConfig) -> BollingerBreakoutStrategy {
        BollingerBreakoutStrategy::new("bollinger_breakout", config)
    }

    #[test]
    fn test_config_validation() {
        let mut config = BreakoutConfig::default();
        assert!(config.validate().is_ok());

        config.window = 1;
        assert!(config.validate().is_err());

        let config = BreakoutConfig {
            std_multiplier: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_breakout_on_last_bar_only() {
        let signals = strategy(BreakoutConfig::default())
            .evaluate(&breakout_series(100.0, 5000.0))
            .unwrap();

        assert_eq!(signals.len(), 25);
        assert!(signals[..24].iter().all(|s| s.kind == SignalKind::Hold));
        assert_eq!(signals[24].kind, SignalKind::Buy);
        assert_eq!(signals[24].date, day(24));
        assert!(signals.iter().all(|s| s.strategy == "bollinger_breakout"));
    }

    #[test]
    fn test_volume_filter_blocks_breakout() {
        let signals = strategy(BreakoutConfig::default())
            .evaluate(&breakout_series(100.0, 1000.0))
            .unwrap();
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));

        let relaxed = BreakoutConfig {
            volume_filter: false,
            ..Default::default()
        };
        let signals = strategy(relaxed)
            .evaluate(&breakout_series(100.0, 1000.0))
            .unwrap();
        assert_eq!(signals[24].kind, SignalKind::Buy);
    }

    #[test]
    fn test_body_filter_blocks_breakout() {
        // Body of 1 against a range of 12
        let signals = strategy(BreakoutConfig::default())
            .evaluate(&breakout_series(109.0, 5000.0))
            .unwrap();
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));
    }

    #[test]
    fn test_atr_filter_blocks_breakout() {
        let strict = BreakoutConfig {
            atr_threshold: 0.5,
            ..Default::default()
        };
        let signals = strategy(strict)
            .evaluate(&breakout_series(100.0, 5000.0))
            .unwrap();
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));
    }

    #[test]
    fn test_short_series_degrades_to_hold() {
        let bars: Vec<Bar> = (0..15)
            .map(|i| Bar::new(day(i), 100.0, 120.0, 90.0, 119.0, 9000.0))
            .collect();
        let series = Series::from_bars("TEST", bars);

        let signals = strategy(BreakoutConfig::default()).evaluate(&series).unwrap();

        assert_eq!(signals.len(), 15);
        assert!(signals.iter().all(|s| s.kind == SignalKind::Hold));
        assert!(signals.iter().all(|s| s.strategy == "bollinger_breakout"));
        assert_eq!(
            signals.iter().map(|s| s.date).collect::<Vec<_>>(),
            series.dates()
        );
    }

    #[test]
    fn test_debug_attaches_diagnostics() {
        let config = BreakoutConfig {
            debug: true,
            ..Default::default()
        };
        let signals = strategy(config)
            .evaluate(&breakout_series(100.0, 5000.0))
            .unwrap();

        let last = &signals[24].diagnostics;
        assert_eq!(last.get("breakout"), Some(&1.0));
        assert_eq!(last.get("volume_ok"), Some(&1.0));
        assert!(last.get("upper_band").unwrap() < &110.0);
        assert!(!signals[0].diagnostics.contains_key("mean"));
    }
}
