//! Round Robin strategy implementations

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use crate::{BalanceError, Provider, Result};
use super::weight::CumulativeWeights;
use super::{ensure_non_empty, Strategy};

/// Per-group rotation cursors
///
/// Each cursor update is one read-modify-write under the owning shard lock,
/// so concurrent callers in the same group never observe the same step.
#[derive(Debug, Default)]
struct CursorTable {
    cursors: DashMap<String, usize>,
}

impl CursorTable {
    /// Advance the cursor of `group` over `len` slots and return the new index
    ///
    /// A group without a cursor starts at 0.
    fn advance(&self, group: &str, len: usize) -> usize {
        if let Some(mut cursor) = self.cursors.get_mut(group) {
            let next = (*cursor + 1) % len;
            *cursor = next;
            return next;
        }

        match self.cursors.entry(group.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = (*entry.get() + 1) % len;
                entry.insert(next);
                next
            }
            Entry::Vacant(entry) => {
                debug!("new round robin cursor for group {}", group);
                entry.insert(0);
                0
            }
        }
    }

    /// Drop the cursor of a group that has run out of providers
    fn discard(&self, group: &str) -> BalanceError {
        if self.cursors.remove(group).is_some() {
            debug!("discarding round robin cursor for empty group {}", group);
            return BalanceError::StaleCursor(group.to_string());
        }
        BalanceError::InvalidInput(format!("group {}: candidate list is empty", group))
    }

    fn get(&self, group: &str) -> Option<usize> {
        self.cursors.get(group).map(|cursor| *cursor)
    }

    fn clear(&self) {
        self.cursors.clear();
    }
}

/// Group key of a candidate list: the interface of its first provider
fn group_key(candidates: &[Provider]) -> &str {
    candidates
        .first()
        .map(|p| p.interface_name.as_str())
        .unwrap_or_default()
}

/// Round Robin strategy - cycles through providers in order, per interface
///
/// Callers must pass each interface's providers in a stable order; the group
/// is taken from the first provider of the list.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursors: CursorTable,
}

impl RoundRobin {
    /// Create a new Round Robin strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Select within an explicitly named group
    ///
    /// An empty list discards the group's cursor, so the next non-empty list
    /// starts again from the first provider.
    pub fn select_in_group<'a>(&self, group: &str, candidates: &'a [Provider]) -> Result<&'a Provider> {
        if candidates.is_empty() {
            return Err(self.cursors.discard(group));
        }

        let idx = self.cursors.advance(group, candidates.len());
        Ok(&candidates[idx])
    }

    /// Current cursor of a group
    pub fn cursor(&self, group: &str) -> Option<usize> {
        self.cursors.get(group)
    }

    /// Forget every cursor
    pub fn reset(&self) {
        self.cursors.clear();
    }
}

impl Strategy for RoundRobin {
    fn select<'a>(&self, candidates: &'a [Provider], _routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;
        self.select_in_group(group_key(candidates), candidates)
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }
}

/// Weighted Round Robin strategy - cycles through the weight-expanded list
///
/// The expansion is recomputed on every call and the cursor is taken modulo
/// its current length, so a weight or membership change between calls can
/// skip or repeat a position once.
#[derive(Debug, Default)]
pub struct WeightedRoundRobin {
    cursors: CursorTable,
}

impl WeightedRoundRobin {
    /// Create a new Weighted Round Robin strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Select within an explicitly named group
    pub fn select_in_group<'a>(&self, group: &str, candidates: &'a [Provider]) -> Result<&'a Provider> {
        if candidates.is_empty() {
            return Err(self.cursors.discard(group));
        }

        let weights = CumulativeWeights::build(candidates)?;
        let total = weights.ensure_selectable(self.name())?;

        let pos = self.cursors.advance(group, total as usize);
        Ok(&candidates[weights.locate(pos as u64)])
    }

    /// Current cursor of a group, as a position in the expanded list
    pub fn cursor(&self, group: &str) -> Option<usize> {
        self.cursors.get(group)
    }

    /// Forget every cursor
    pub fn reset(&self) {
        self.cursors.clear();
    }
}

impl Strategy for WeightedRoundRobin {
    fn select<'a>(&self, candidates: &'a [Provider], _routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;
        self.select_in_group(group_key(candidates), candidates)
    }

    fn name(&self) -> &'static str {
        "weighted-round-robin"
    }
}
