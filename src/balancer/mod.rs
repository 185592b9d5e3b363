//! # Balancer Module
//!
//! The facade request routers hold. It owns one strategy, which can be
//! swapped at runtime, and forwards every selection to it.

use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::strategy::{create_strategy, Strategy, StrategyKind};
use crate::util::BalanceConfig;
use crate::{Provider, Result};

/// Provider selection facade
pub struct LoadBalancer {
    strategy: RwLock<Arc<dyn Strategy>>,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self::with_kind(StrategyKind::default())
    }
}

impl LoadBalancer {
    /// Create a balancer around an existing strategy
    pub fn new(strategy: Arc<dyn Strategy>) -> Self {
        Self {
            strategy: RwLock::new(strategy),
        }
    }

    /// Create a balancer using a strategy kind with default settings
    pub fn with_kind(kind: StrategyKind) -> Self {
        Self::new(create_strategy(kind))
    }

    /// Create a balancer from configuration
    pub fn from_config(config: &BalanceConfig) -> Result<Self> {
        let strategy = config.build_strategy()?;
        info!("load balancer using {} strategy", strategy.name());
        Ok(Self::new(strategy))
    }

    /// Select one provider for a request
    pub fn select<'a>(&self, candidates: &'a [Provider], routing_key: Option<&str>) -> Result<&'a Provider> {
        // Release the lock before selecting so a swap never waits on a call
        let strategy = self.strategy();
        match strategy.select(candidates, routing_key) {
            Ok(provider) => {
                debug!("{} selected {}", strategy.name(), provider.address());
                Ok(provider)
            }
            Err(e) => {
                debug!("{} selection failed: {}", strategy.name(), e);
                Err(e)
            }
        }
    }

    /// Replace the strategy; in-flight selections finish on the old one
    pub fn set_strategy(&self, strategy: Arc<dyn Strategy>) {
        let mut current = self.strategy.write();
        info!("switching strategy from {} to {}", current.name(), strategy.name());
        *current = strategy;
    }

    /// Get the current strategy
    pub fn strategy(&self) -> Arc<dyn Strategy> {
        self.strategy.read().clone()
    }

    /// Name of the current strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.read().name()
    }
}
