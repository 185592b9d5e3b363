//! Weight-based selection utilities

use crate::{BalanceError, Provider, Result};

/// Running weight totals of a candidate list
///
/// Position `p` in the conceptual expansion (each provider repeated `weight`
/// times) belongs to the first provider whose running total exceeds `p`.
/// This gives the same mapping as materializing the expansion without
/// allocating `sum(weight)` entries.
#[derive(Debug, Clone)]
pub(crate) struct CumulativeWeights {
    bounds: Vec<u64>,
}

impl CumulativeWeights {
    /// Build running totals, rejecting negative weights
    pub(crate) fn build(candidates: &[Provider]) -> Result<Self> {
        let mut bounds = Vec::with_capacity(candidates.len());
        let mut total: u64 = 0;

        for provider in candidates {
            if provider.weight < 0 {
                return Err(BalanceError::MisconfiguredWeight {
                    address: provider.address(),
                    weight: provider.weight,
                });
            }
            total += provider.weight as u64;
            bounds.push(total);
        }

        Ok(Self { bounds })
    }

    /// Length of the expanded list
    pub(crate) fn total(&self) -> u64 {
        self.bounds.last().copied().unwrap_or(0)
    }

    /// Fail when no provider carries weight
    pub(crate) fn ensure_selectable(&self, strategy: &str) -> Result<u64> {
        let total = self.total();
        if total == 0 {
            return Err(BalanceError::InvalidInput(format!(
                "{}: every candidate has zero weight",
                strategy
            )));
        }
        Ok(total)
    }

    /// Candidate index owning expanded position `pos`
    pub(crate) fn locate(&self, pos: u64) -> usize {
        self.bounds.partition_point(|&bound| bound <= pos)
    }
}
