//! # Strategy Module
//!
//! This module implements load balancing strategies for provider selection.
//!
//! ## Strategies
//!
//! - **Random**: Uniformly selects a provider
//! - **Weighted Random**: Random selection proportional to provider weight
//! - **Round Robin**: Default strategy, cycles through providers per interface
//! - **Weighted Round Robin**: Cycles through the weight-expanded provider list
//! - **Least Loaded**: Selects the provider with the lowest observed latency
//! - **Consistent Hash**: Uses consistent hashing with virtual nodes
//!
//! Strategies never own the provider list. Callers pass the current list on
//! every call and get back a reference into it.

mod random;
mod weight;
mod roundrobin;
mod leastloaded;
mod consistenthash;

pub use random::{Random, WeightedRandom};
pub use roundrobin::{RoundRobin, WeightedRoundRobin};
pub use leastloaded::LeastLoaded;
pub use consistenthash::{ConsistentHash, HashRing};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::{BalanceError, Provider, Result};

/// Strategy trait for load balancing
pub trait Strategy: Send + Sync {
    /// Select one provider from `candidates`
    ///
    /// `routing_key` is only consulted by hash based strategies.
    fn select<'a>(&self, candidates: &'a [Provider], routing_key: Option<&str>) -> Result<&'a Provider>;

    /// Strategy name
    fn name(&self) -> &'static str;
}

/// Strategy kinds known to the balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Random,
    WeightedRandom,
    #[default]
    RoundRobin,
    WeightedRoundRobin,
    LeastLoaded,
    ConsistentHash,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Random,
        StrategyKind::WeightedRandom,
        StrategyKind::RoundRobin,
        StrategyKind::WeightedRoundRobin,
        StrategyKind::LeastLoaded,
        StrategyKind::ConsistentHash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::WeightedRandom => "weighted-random",
            StrategyKind::RoundRobin => "round-robin",
            StrategyKind::WeightedRoundRobin => "weighted-round-robin",
            StrategyKind::LeastLoaded => "least-loaded",
            StrategyKind::ConsistentHash => "consistent-hash",
        }
    }

    /// Whether this strategy keeps state between calls
    pub fn is_stateful(&self) -> bool {
        matches!(self, StrategyKind::RoundRobin | StrategyKind::WeightedRoundRobin)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "weighted-random" | "weightedrandom" | "wr" => Ok(StrategyKind::WeightedRandom),
            "round-robin" | "roundrobin" | "rr" => Ok(StrategyKind::RoundRobin),
            "weighted-round-robin" | "weightedroundrobin" | "wrr" => Ok(StrategyKind::WeightedRoundRobin),
            "least-loaded" | "leastloaded" | "least" => Ok(StrategyKind::LeastLoaded),
            "consistent-hash" | "consistenthash" | "ch" => Ok(StrategyKind::ConsistentHash),
            _ => Err(BalanceError::Config(format!("unknown strategy: {}", s))),
        }
    }
}

/// Create a strategy by kind with default settings
pub fn create_strategy(kind: StrategyKind) -> Arc<dyn Strategy> {
    match kind {
        StrategyKind::Random => Arc::new(Random::new()),
        StrategyKind::WeightedRandom => Arc::new(WeightedRandom::new()),
        StrategyKind::RoundRobin => Arc::new(RoundRobin::new()),
        StrategyKind::WeightedRoundRobin => Arc::new(WeightedRoundRobin::new()),
        StrategyKind::LeastLoaded => Arc::new(LeastLoaded::new()),
        StrategyKind::ConsistentHash => Arc::new(ConsistentHash::new()),
    }
}

/// Reject an empty candidate list
pub(crate) fn ensure_non_empty(candidates: &[Provider], strategy: &str) -> Result<()> {
    if candidates.is_empty() {
        return Err(BalanceError::InvalidInput(format!(
            "{}: candidate list is empty",
            strategy
        )));
    }
    Ok(())
}
