//! FX hedging strategy catalog.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::MarketDataError;

/// A hedging or FX trading strategy offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Strategy {
    /// Stable identifier, used in `estrategia://item/{id}`.
    pub id: String,
    /// Display name.
    pub titulo: String,
    /// Risk level (e.g. "bajo", "medio").
    pub riesgo: String,
    /// Time horizon the strategy targets.
    pub horizonte: String,
}

impl Strategy {
    pub fn new(id: &str, titulo: &str, riesgo: &str, horizonte: &str) -> Self {
        Self {
            id: id.to_string(),
            titulo: titulo.to_string(),
            riesgo: riesgo.to_string(),
            horizonte: horizonte.to_string(),
        }
    }
}

/// Ordered, read-only list of strategies.
#[derive(Debug, Clone)]
pub struct StrategyCatalog {
    strategies: Vec<Strategy>,
}

impl StrategyCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(strategies: Vec<Strategy>) -> Result<Self, MarketDataError> {
        for (i, s) in strategies.iter().enumerate() {
            if strategies[..i].iter().any(|other| other.id == s.id) {
                return Err(MarketDataError::DuplicateStrategyId(s.id.clone()));
            }
        }
        Ok(Self { strategies })
    }

    /// The built-in strategy list.
    pub fn builtin() -> Result<Self, MarketDataError> {
        Self::new(vec![
            Strategy::new("carry-trade", "Carry trade", "medio", "mediano"),
            Strategy::new("hedge-forward", "Hedge con forward", "bajo", "corto/mediano"),
            Strategy::new("butterfly", "Butterfly options FX", "medio/alto", "evento"),
        ])
    }

    pub fn all(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn get(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id.as_str()).collect()
    }
}
