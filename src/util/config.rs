//! Configuration structures

use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;
use crate::strategy::{create_strategy, ConsistentHash, Strategy, StrategyKind};
use crate::{consts, BalanceError, Result};

/// Load balancer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Selection strategy
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Virtual nodes per provider for consistent hashing
    #[serde(default = "default_virtual_nodes")]
    pub virtual_nodes: usize,
    /// Hash function for consistent hashing
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_virtual_nodes() -> usize { consts::DEFAULT_VIRTUAL_NODES }
fn default_log_level() -> String { "INFO".to_string() }

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            virtual_nodes: default_virtual_nodes(),
            hash: HashAlgorithm::default(),
            log_level: default_log_level(),
        }
    }
}

impl BalanceConfig {
    /// Parse TOML configuration
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| BalanceError::Config(format!("invalid toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON configuration
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| BalanceError::Config(format!("invalid json: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BalanceError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") | None => Self::from_toml_str(&content),
            Some(other) => Err(BalanceError::Config(format!(
                "unsupported config format: {}",
                other
            ))),
        }
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.virtual_nodes == 0 {
            return Err(BalanceError::Config("virtual_nodes must be at least 1".to_string()));
        }
        self.log_level.parse::<crate::LogLevel>()?;
        Ok(())
    }

    /// Build the configured strategy
    pub fn build_strategy(&self) -> Result<Arc<dyn Strategy>> {
        self.validate()?;
        let strategy: Arc<dyn Strategy> = match self.strategy {
            StrategyKind::ConsistentHash => Arc::new(
                ConsistentHash::with_virtual_nodes(self.virtual_nodes)?.with_hasher(self.hash),
            ),
            kind => create_strategy(kind),
        };
        Ok(strategy)
    }
}
