//! Consistent Hash strategy implementation

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use rand::Rng;
use tracing::{enabled, trace, Level};
use crate::hash::{HashAlgorithm, HashFunction};
use crate::{consts, BalanceError, Provider, Result};
use super::{ensure_non_empty, Strategy};

/// Sorted ring of virtual nodes: 31-bit hash -> provider
pub struct HashRing<'a> {
    nodes: BTreeMap<u32, &'a Provider>,
}

impl<'a> HashRing<'a> {
    /// Number of virtual nodes on the ring
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk clockwise from `hash` to the first virtual node
    ///
    /// A node at exactly `hash` matches. Past the last node the walk wraps
    /// to the smallest key.
    pub fn locate(&self, hash: u32) -> Option<&'a Provider> {
        self.nodes
            .range(hash..)
            .next()
            .or_else(|| self.nodes.iter().next())
            .map(|(_, &provider)| provider)
    }

    /// Provider of a uniformly chosen virtual node
    pub fn random(&self) -> Option<&'a Provider> {
        if self.nodes.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.nodes.len());
        self.nodes.values().nth(idx).copied()
    }

    /// Iterate virtual nodes in ascending hash order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &'a Provider)> + '_ {
        self.nodes.iter().map(|(&hash, &provider)| (hash, provider))
    }

    /// Smallest ring key
    pub fn first_key(&self) -> Option<u32> {
        self.nodes.keys().next().copied()
    }

    /// Largest ring key
    pub fn last_key(&self) -> Option<u32> {
        self.nodes.keys().next_back().copied()
    }
}

impl fmt::Debug for HashRing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.nodes.iter().map(|(hash, p)| (hash, p.address())))
            .finish()
    }
}

/// Consistent Hash strategy with virtual nodes
///
/// The ring is rebuilt from the supplied candidates on every call, so it
/// always reflects the live provider set. Requests without a routing key
/// fall back to a random virtual node.
pub struct ConsistentHash {
    /// Virtual nodes per provider
    virtual_nodes: usize,
    /// Hash applied to virtual node keys and routing keys
    hasher: Arc<dyn HashFunction>,
}

impl Default for ConsistentHash {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistentHash {
    /// Create a new Consistent Hash strategy with default virtual nodes and hash
    pub fn new() -> Self {
        Self {
            virtual_nodes: consts::DEFAULT_VIRTUAL_NODES,
            hasher: Arc::new(HashAlgorithm::default()),
        }
    }

    /// Create with a custom virtual node count
    pub fn with_virtual_nodes(virtual_nodes: usize) -> Result<Self> {
        if virtual_nodes == 0 {
            return Err(BalanceError::Config(
                "consistent hash needs at least one virtual node".to_string(),
            ));
        }
        Ok(Self {
            virtual_nodes,
            ..Self::new()
        })
    }

    /// Replace the hash function
    pub fn with_hasher(mut self, hasher: impl HashFunction + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Virtual nodes per provider
    pub fn virtual_nodes(&self) -> usize {
        self.virtual_nodes
    }

    /// Build the hash ring for a candidate list
    ///
    /// Virtual nodes that hash to the same value keep the last provider
    /// written.
    pub fn build_ring<'a>(&self, candidates: &'a [Provider]) -> Result<HashRing<'a>> {
        let mut nodes = BTreeMap::new();

        for provider in candidates {
            for i in 0..self.virtual_nodes {
                let key = self.hash(&provider.virtual_node_key(i))?;
                nodes.insert(key, provider);
            }
        }

        let ring = HashRing { nodes };
        if enabled!(Level::TRACE) {
            for (hash, provider) in ring.iter() {
                trace!("ring node {} -> {}", hash, provider.address());
            }
        }
        Ok(ring)
    }

    fn hash(&self, key: &str) -> Result<u32> {
        let hash = self.hasher.hash(key).map_err(|e| match e {
            BalanceError::InvalidInput(msg) => BalanceError::InvalidInput(msg),
            other => BalanceError::InvalidInput(format!("{}: {}", self.hasher.name(), other)),
        })?;
        Ok(hash & consts::HASH_MASK)
    }
}

impl Strategy for ConsistentHash {
    fn select<'a>(&self, candidates: &'a [Provider], routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;

        let ring = self.build_ring(candidates)?;
        let chosen = match routing_key {
            Some(key) => {
                let hash = self.hash(key)?;
                let chosen = ring.locate(hash);
                if let Some(p) = chosen {
                    trace!("routing key {} (hash {}) -> {}", key, hash, p.address());
                }
                chosen
            }
            None => ring.random(),
        };

        chosen.ok_or_else(|| BalanceError::InvalidInput("consistent hash: ring is empty".to_string()))
    }

    fn name(&self) -> &'static str {
        "consistent-hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::providers;
    use std::collections::{HashMap, HashSet};

    /// Hash function with hand-placed values
    struct FixedHash(HashMap<String, u32>);

    impl FixedHash {
        fn new(entries: &[(&str, u32)]) -> Self {
            Self(entries.iter().map(|&(k, v)| (k.to_string(), v)).collect())
        }
    }

    impl HashFunction for FixedHash {
        fn hash(&self, input: &str) -> Result<u32> {
            self.0
                .get(input)
                .copied()
                .ok_or_else(|| BalanceError::InvalidInput(format!("unhashable: {}", input)))
        }
    }

    fn two_node_ring() -> (ConsistentHash, Vec<Provider>) {
        let candidates = vec![Provider::new("a", 1), Provider::new("b", 2)];
        let hasher = FixedHash::new(&[
            ("a:1&&node0", 100),
            ("b:2&&node0", 200),
            ("low", 50),
            ("mid", 150),
            ("exact", 200),
            ("high", 300),
        ]);
        let strategy = ConsistentHash::with_virtual_nodes(1).unwrap().with_hasher(hasher);
        (strategy, candidates)
    }

    #[test]
    fn test_consistenthash_empty() {
        let strategy = ConsistentHash::new();
        assert!(strategy.select(&[], Some("key")).is_err());
    }

    #[test]
    fn test_consistenthash_single() {
        let candidates = providers(1);
        let strategy = ConsistentHash::new();

        let ring = strategy.build_ring(&candidates).unwrap();
        assert_eq!(ring.len(), consts::DEFAULT_VIRTUAL_NODES);

        for i in 0..20 {
            let key = format!("user-{}", i);
            assert_eq!(strategy.select(&candidates, Some(&key)).unwrap().port, 10000);
        }
    }

    #[test]
    fn test_consistenthash_ring_size() {
        let candidates = providers(10);
        let strategy = ConsistentHash::with_virtual_nodes(20).unwrap();
        let ring = strategy.build_ring(&candidates).unwrap();

        // Collisions may only shrink the ring
        assert!(ring.len() <= 200);
        assert!(ring.len() > 190);
    }

    #[test]
    fn test_consistenthash_clockwise() {
        let (strategy, candidates) = two_node_ring();

        assert_eq!(strategy.select(&candidates, Some("low")).unwrap().host, "a");
        assert_eq!(strategy.select(&candidates, Some("mid")).unwrap().host, "b");
    }

    #[test]
    fn test_consistenthash_exact_match() {
        let (strategy, candidates) = two_node_ring();
        assert_eq!(strategy.select(&candidates, Some("exact")).unwrap().host, "b");
    }

    #[test]
    fn test_consistenthash_wraparound() {
        let (strategy, candidates) = two_node_ring();
        let ring = strategy.build_ring(&candidates).unwrap();
        assert_eq!(ring.first_key(), Some(100));
        assert_eq!(ring.last_key(), Some(200));

        // 300 lies past the largest key: wrap to the smallest
        assert_eq!(strategy.select(&candidates, Some("high")).unwrap().host, "a");
    }

    #[test]
    fn test_consistenthash_collision_last_write_wins() {
        let candidates = vec![Provider::new("a", 1), Provider::new("b", 2)];
        let hasher = FixedHash::new(&[("a:1&&node0", 100), ("b:2&&node0", 100), ("k", 1)]);
        let strategy = ConsistentHash::with_virtual_nodes(1).unwrap().with_hasher(hasher);

        let ring = strategy.build_ring(&candidates).unwrap();
        assert_eq!(ring.len(), 1);
        assert_eq!(strategy.select(&candidates, Some("k")).unwrap().host, "b");
    }

    #[test]
    fn test_consistenthash_hash_failure() {
        let (strategy, candidates) = two_node_ring();
        let err = strategy.select(&candidates, Some("unknown")).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_consistenthash_consistent() {
        let candidates = providers(3);
        let strategy = ConsistentHash::new();

        // Same key should always select same provider
        let p1 = strategy.select(&candidates, Some("order-12345")).unwrap();
        let p2 = strategy.select(&candidates, Some("order-12345")).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_consistenthash_no_key_falls_back_to_random() {
        let candidates = providers(4);
        let strategy = ConsistentHash::new();

        let ports: HashSet<u16> = (0..200)
            .map(|_| strategy.select(&candidates, None).unwrap().port)
            .collect();
        assert!(ports.len() > 1);
    }

    #[test]
    fn test_consistenthash_distribution() {
        let candidates = providers(3);
        let strategy = ConsistentHash::with_virtual_nodes(100).unwrap();

        let mut counts = HashMap::new();
        for i in 0..1000 {
            let key = format!("key_{}", i);
            let p = strategy.select(&candidates, Some(&key)).unwrap();
            *counts.entry(p.port).or_insert(0) += 1;
        }

        // Each provider should get some requests (rough distribution)
        assert_eq!(counts.len(), 3);
        for (port, count) in counts {
            println!("Port {}: {} requests", port, count);
            assert!(count > 0);
        }
    }

    #[test]
    fn test_consistenthash_removal_stability() {
        let candidates = providers(5);
        let strategy = ConsistentHash::new();
        let keys: Vec<String> = (0..200).map(|i| format!("session-{}", i)).collect();

        let before: Vec<u16> = keys
            .iter()
            .map(|k| strategy.select(&candidates, Some(k.as_str())).unwrap().port)
            .collect();

        let removed = candidates[2].port;
        let survivors: Vec<Provider> = candidates
            .iter()
            .filter(|p| p.port != removed)
            .cloned()
            .collect();

        for (key, &old) in keys.iter().zip(before.iter()) {
            let new = strategy.select(&survivors, Some(key.as_str())).unwrap().port;
            if old != removed {
                assert_eq!(new, old, "key {} moved from {} to {}", key, old, new);
            } else {
                assert_ne!(new, removed);
            }
        }
    }

    #[test]
    fn test_consistenthash_minimal_disruption_on_add() {
        let candidates = providers(3);
        let strategy = ConsistentHash::with_virtual_nodes(100).unwrap();
        let keys: Vec<String> = (0..100).map(|i| format!("key_{}", i)).collect();

        let initial: Vec<u16> = keys
            .iter()
            .map(|k| strategy.select(&candidates, Some(k.as_str())).unwrap().port)
            .collect();

        let grown = providers(4);
        let changed = keys
            .iter()
            .zip(initial.iter())
            .filter(|(k, old)| strategy.select(&grown, Some(k.as_str())).unwrap().port != **old)
            .count();

        // Only keys captured by the new provider move; roughly a quarter
        println!("Changed: {}/100", changed);
        assert!(changed < 50, "Too many changes: {}", changed);
    }

    #[test]
    fn test_zero_virtual_nodes_rejected() {
        assert!(matches!(
            ConsistentHash::with_virtual_nodes(0),
            Err(BalanceError::Config(_))
        ));
    }
}
