//! Strategy registry: a compile-time catalog of strategy kinds and the
//! construction of configured instances from it.

use crate::{BollingerBreakoutStrategy, BreakoutConfig, GapOpenConfig, GapOpenStrategy};
use serde::{Deserialize, Serialize};
use signals_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};
use std::collections::{BTreeMap, HashSet};

/// Builds a strategy instance from its id and JSON parameters.
pub type StrategyFactory =
    fn(id: &str, params: serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError>;

/// Information about a registered strategy kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Kind name used in configuration
    pub kind: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
    #[serde(skip)]
    factory: Option<StrategyFactory>,
}

/// One configured strategy instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    /// Id stamped on emitted signals
    pub id: String,
    /// Catalog kind to build
    pub kind: String,
    /// Parameter overrides; missing keys take the kind's defaults
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl StrategySpec {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            params: serde_json::Value::Null,
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// One instance of every built-in kind with its tuned defaults.
pub fn default_instances() -> Vec<StrategySpec> {
    vec![
        StrategySpec::new("bollinger_breakout", "bollinger_breakout"),
        StrategySpec::new("gap_open", "gap_open"),
    ]
}

fn build_breakout(id: &str, params: serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> {
    let config: BreakoutConfig = parse_params(params)?;
    config.validate()?;
    Ok(Box::new(BollingerBreakoutStrategy::new(id, config)))
}

fn build_gap_open(id: &str, params: serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> {
    let config: GapOpenConfig = parse_params(params)?;
    config.validate()?;
    Ok(Box::new(GapOpenStrategy::new(id, config)))
}

fn parse_params<T>(params: serde_json::Value) -> Result<T, StrategyError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

/// Strategies that were built successfully, in configuration order.
#[derive(Default)]
pub struct LoadedStrategies {
    strategies: Vec<Box<dyn Strategy>>,
    failures: Vec<(String, StrategyError)>,
}

impl LoadedStrategies {
    /// Build directly from instances, bypassing the catalog.
    pub fn from_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            strategies,
            failures: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Instances that could not be built, with the reason.
    pub fn failures(&self) -> &[(String, StrategyError)] {
        &self.failures
    }
}

/// Registry of available strategy kinds.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new registry with all built-in kinds.
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };

        registry.register(
            "bollinger_breakout",
            "Upper Bollinger band breakout filtered by candle body, volume and ATR",
            serde_json::to_value(BreakoutConfig::default()).unwrap_or_default(),
            build_breakout,
        );

        registry.register(
            "gap_open",
            "Fades opening gaps larger than a relative threshold and an absolute floor",
            serde_json::to_value(GapOpenConfig::default()).unwrap_or_default(),
            build_gap_open,
        );

        registry
    }

    /// Add a kind to the catalog, replacing any kind with the same name.
    pub fn register(
        &mut self,
        kind: &str,
        description: &str,
        default_config: serde_json::Value,
        factory: StrategyFactory,
    ) {
        self.strategies.insert(
            kind.to_string(),
            StrategyInfo {
                kind: kind.to_string(),
                description: description.to_string(),
                default_config,
                factory: Some(factory),
            },
        );
    }

    /// List all available kinds, sorted by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get kind info by name.
    pub fn get(&self, kind: &str) -> Option<&StrategyInfo> {
        self.strategies.get(kind)
    }

    /// Check if a kind exists.
    pub fn exists(&self, kind: &str) -> bool {
        self.strategies.contains_key(kind)
    }

    /// Get all kind names.
    pub fn names(&self) -> Vec<&String> {
        self.strategies.keys().collect()
    }

    /// Create a strategy instance from configuration.
    pub fn create(
        &self,
        kind: &str,
        id: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let factory = self
            .get(kind)
            .and_then(|info| info.factory)
            .ok_or_else(|| StrategyError::NotFound(kind.to_string()))?;
        factory(id, config)
    }

    /// Create a strategy with default configuration, using the kind as id.
    pub fn create_default(&self, kind: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(kind)
            .ok_or_else(|| StrategyError::NotFound(kind.to_string()))?;
        self.create(kind, kind, info.default_config.clone())
    }

    /// Build every configured instance.
    ///
    /// An instance that fails to build is logged and left out; the others
    /// are unaffected.
    pub fn discover(&self, specs: &[StrategySpec]) -> LoadedStrategies {
        let mut loaded = LoadedStrategies::default();
        let mut seen = HashSet::new();

        for spec in specs {
            let result = if seen.contains(spec.id.as_str()) {
                Err(StrategyError::InitializationFailed(format!(
                    "duplicate strategy id '{}'",
                    spec.id
                )))
            } else {
                self.create(&spec.kind, &spec.id, spec.params.clone())
            };

            match result {
                Ok(strategy) => {
                    tracing::info!(id = %spec.id, kind = %spec.kind, "Registered strategy");
                    seen.insert(spec.id.clone());
                    loaded.strategies.push(strategy);
                }
                Err(e) => {
                    tracing::error!(
                        id = %spec.id,
                        kind = %spec.kind,
                        error = %e,
                        "Failed to load strategy"
                    );
                    loaded.failures.push((spec.id.clone(), e));
                }
            }
        }

        loaded
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("kinds", &self.names())
            .finish()
    }
}
