use std::sync::Arc;

use tracing::{info, warn};

use common::{Error, ExecutionService, PriceFeed};

use crate::config::StrategyFileConfig;
use crate::trigger::{TriggerState, TriggerStrategy};

/// A config entry that failed validation and was never attached.
#[derive(Debug)]
pub struct Rejected {
    pub name: String,
    pub error: Error,
}

/// Holds every trigger built from a strategy file.
pub struct StrategyRegistry {
    strategies: Vec<Arc<TriggerStrategy>>,
    rejected: Vec<Rejected>,
}

impl StrategyRegistry {
    /// Build a trigger per config entry and attach the valid ones to `feed`.
    /// Invalid entries are logged and kept in [`StrategyRegistry::rejected`].
    pub fn attach_all(
        file_cfg: &StrategyFileConfig,
        feed: &Arc<dyn PriceFeed>,
        execution: Arc<dyn ExecutionService>,
    ) -> Self {
        let mut strategies = Vec::new();
        let mut rejected = Vec::new();

        for entry in &file_cfg.strategies {
            match TriggerStrategy::new(entry.config.clone(), execution.clone()) {
                Ok(strategy) => {
                    strategies.push(strategy.with_name(entry.name.clone()).attach(feed));
                }
                Err(error) => {
                    warn!(name = %entry.name, error = %error, "Strategy rejected");
                    rejected.push(Rejected {
                        name: entry.name.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            armed = strategies.len(),
            rejected = rejected.len(),
            "Strategy registry ready"
        );
        Self {
            strategies,
            rejected,
        }
    }

    pub fn strategies(&self) -> &[Arc<TriggerStrategy>] {
        &self.strategies
    }

    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    pub fn armed_count(&self) -> usize {
        self.strategies
            .iter()
            .filter(|s| s.state() == TriggerState::Armed)
            .count()
    }

    /// True once every attached trigger has fired. Vacuously true when
    /// nothing was attached.
    pub fn all_fired(&self) -> bool {
        self.armed_count() == 0
    }
}
