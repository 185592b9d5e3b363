//! # Tars Balance
//!
//! Provider selection for Tars clients. Given the live list of providers for a
//! servant and an optional routing key, a strategy picks exactly one provider
//! to dispatch the request to.
//!
//! ## Architecture
//!
//! The crate is organized into the following layers:
//!
//! - **Balancer**: the facade callers hold; delegates to a swappable strategy
//! - **Strategy**: random, weighted random, round robin, weighted round robin,
//!   least loaded and consistent hash selection
//! - **Hash**: pluggable string hash functions used by hash based routing
//! - **Provider**: the candidate model supplied by the caller on every call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tars_balance::{LoadBalancer, Provider, StrategyKind};
//!
//! let balancer = LoadBalancer::with_kind(StrategyKind::ConsistentHash);
//! let providers = vec![
//!     Provider::new("127.0.0.1", 10000),
//!     Provider::new("127.0.0.1", 10001),
//! ];
//! let chosen = balancer.select(&providers, Some("user-42"))?;
//! ```

pub mod provider;
pub mod hash;
pub mod strategy;
pub mod balancer;
pub mod util;
pub mod logger;

// Re-export commonly used types
pub use provider::Provider;
pub use hash::{HashAlgorithm, HashFunction};
pub use strategy::{
    Strategy, StrategyKind, create_strategy, Random, WeightedRandom, RoundRobin,
    WeightedRoundRobin, LeastLoaded, ConsistentHash, HashRing,
};
pub use balancer::LoadBalancer;
pub use util::BalanceConfig;
pub use logger::{init_logging, LogLevel};

/// Error types for provider selection
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum BalanceError {
        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("Misconfigured weight: provider {address} has weight {weight}")]
        MisconfiguredWeight { address: String, weight: i32 },

        #[error("Stale cursor: group {0} has no providers")]
        StaleCursor(String),

        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl BalanceError {
        /// Whether the caller passed something no strategy can select from.
        ///
        /// Weight and cursor failures are specialised forms of invalid input.
        pub fn is_invalid_input(&self) -> bool {
            matches!(
                self,
                BalanceError::InvalidInput(_)
                    | BalanceError::MisconfiguredWeight { .. }
                    | BalanceError::StaleCursor(_)
            )
        }
    }

    pub type Result<T> = std::result::Result<T, BalanceError>;
}

pub use error::{BalanceError, Result};

/// Constants used throughout the crate
pub mod consts {
    /// Virtual nodes placed on the ring per provider
    pub const DEFAULT_VIRTUAL_NODES: usize = 5;

    /// Separator between a provider address and its virtual node index
    pub const VIRTUAL_NODE_SEPARATOR: &str = "&&node";

    /// Hash values are confined to 31 bits
    pub const HASH_MASK: u32 = 0x7FFF_FFFF;

    /// Longest string accepted by the built-in hash functions
    pub const MAX_HASH_INPUT_LEN: usize = 64 * 1024;

    /// Provider defaults
    pub const DEFAULT_WEIGHT: i32 = 100;
    pub const DEFAULT_INTERFACE: &str = "";
}
