use std::path::Path;

use serde::{Deserialize, Serialize};

use common::{Result, Side};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// name = "IBM dip buy"
/// security = "IBM"
/// trigger_price = 55.0
/// size = 100
/// side = "BUY"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<NamedStrategyConfig>,
}

/// One `[[strategy]]` table: a display name plus the trigger parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedStrategyConfig {
    /// Human-readable name shown in logs.
    pub name: String,
    #[serde(flatten)]
    pub config: StrategyConfig,
}

/// Trigger parameters for one strategy.
///
/// Plain value: nothing is checked here. `TriggerStrategy::new` rejects
/// values that are not fully valid, so fields that may be missing in a
/// config file stay representable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyConfig {
    security: Option<String>,
    trigger_price: f64,
    size: i64,
    side: Option<Side>,
}

impl StrategyConfig {
    pub fn new(security: impl Into<String>, trigger_price: f64, size: i64, side: Side) -> Self {
        Self::from_parts(Some(security.into()), trigger_price, size, Some(side))
    }

    /// Build from possibly-absent parts.
    pub fn from_parts(
        security: Option<String>,
        trigger_price: f64,
        size: i64,
        side: Option<Side>,
    ) -> Self {
        Self {
            security,
            trigger_price,
            size,
            side,
        }
    }

    pub fn security(&self) -> Option<&str> {
        self.security.as_deref()
    }

    pub fn trigger_price(&self) -> f64 {
        self.trigger_price
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
