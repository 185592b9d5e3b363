//! Least Loaded strategy implementation

use crate::{Provider, Result};
use super::{ensure_non_empty, Strategy};

/// Least Loaded strategy - selects the provider with the lowest observed latency
///
/// Ties go to the provider listed first. Latency is refreshed by the caller;
/// this strategy only reads it.
#[derive(Debug, Default)]
pub struct LeastLoaded;

impl LeastLoaded {
    /// Create a new Least Loaded strategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for LeastLoaded {
    fn select<'a>(&self, candidates: &'a [Provider], _routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;

        // min_by_key keeps the first of equal minimums
        let chosen = candidates
            .iter()
            .min_by_key(|p| p.observed_latency)
            .unwrap_or(&candidates[0]);
        Ok(chosen)
    }

    fn name(&self) -> &'static str {
        "least-loaded"
    }
}
