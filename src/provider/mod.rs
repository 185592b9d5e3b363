//! # Provider Module
//!
//! This module defines the candidate backend handed to every strategy.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use crate::consts;

/// Candidate backend information
///
/// Identity is the `(host, port)` pair. Two providers with the same address
/// but different weights or latencies compare equal.
#[derive(Debug, Clone, Default)]
pub struct Provider {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Interface (servant) name, also the round robin group key
    pub interface_name: String,
    /// Methods exposed by this provider
    pub methods: BTreeSet<String>,
    /// Owning application name
    pub application: String,
    /// Weight value, negative values are rejected by weighted strategies
    pub weight: i32,
    /// Observed call latency, refreshed by the caller
    pub observed_latency: u32,
}

impl Provider {
    /// Create a new provider with the default weight
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            interface_name: consts::DEFAULT_INTERFACE.to_string(),
            methods: BTreeSet::new(),
            application: String::new(),
            weight: consts::DEFAULT_WEIGHT,
            observed_latency: 0,
        }
    }

    /// Set the interface name
    pub fn with_interface(mut self, interface_name: impl Into<String>) -> Self {
        self.interface_name = interface_name.into();
        self
    }

    /// Set the application name
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the observed latency
    pub fn with_latency(mut self, observed_latency: u32) -> Self {
        self.observed_latency = observed_latency;
        self
    }

    /// Add exposed methods
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    /// Check if this provider exposes a method
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    /// Get address string "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Ring key of the given virtual node, "host:port&&node{idx}"
    pub fn virtual_node_key(&self, idx: usize) -> String {
        format!("{}:{}{}{}", self.host, self.port, consts::VIRTUAL_NODE_SEPARATOR, idx)
    }

    /// Format as provider string
    pub fn to_provider_string(&self) -> String {
        format!(
            "tcp -h {} -p {} -w {} -l {}",
            self.host, self.port, self.weight, self.observed_latency
        )
    }

    /// Parse from provider string
    pub fn from_string(s: &str) -> Option<Self> {
        crate::util::parse_provider_string(s)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_provider_string())
    }
}

impl PartialEq for Provider {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for Provider {}

impl Hash for Provider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}
