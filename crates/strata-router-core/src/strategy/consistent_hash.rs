//! Consistent Hash Sharding Algorithm
//!
//! Places every candidate on a blake3 hash ring with virtual nodes, so adding
//! or removing a shard only moves the keys adjacent to it on the ring.

use blake3::Hasher;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use strata_core::Value;

use super::{retain_candidates, SingleKeyShardingAlgorithm};
use crate::error::StrategyError;

type Ring = BTreeMap<u64, usize>;

/// Consistent hash algorithm over the candidate names, with cached hash ring
#[derive(Debug)]
pub struct ConsistentHashShardingAlgorithm {
    /// Number of virtual nodes per candidate for better distribution
    virtual_nodes: u32,
    /// Ring for the last candidate list seen, keyed by that exact list
    ring_cache: RwLock<Option<(Vec<String>, Arc<Ring>)>>,
}

impl ConsistentHashShardingAlgorithm {
    /// Create with the default 150 virtual nodes
    pub fn new() -> Self {
        Self::with_virtual_nodes(150)
    }

    pub fn with_virtual_nodes(virtual_nodes: u32) -> Self {
        Self {
            virtual_nodes: virtual_nodes.max(1),
            ring_cache: RwLock::new(None),
        }
    }

    fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hasher = Hasher::new();
        hasher.update(bytes);
        let hash = hasher.finalize();
        let bytes = hash.as_bytes();
        u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
            bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    }

    /// Get or build the ring for `candidates`, using the cache if it matches
    fn get_or_build_ring(&self, candidates: &[String]) -> Arc<Ring> {
        {
            let cache = self.ring_cache.read();
            if let Some((cached, ring)) = cache.as_ref() {
                if cached.as_slice() == candidates {
                    return ring.clone();
                }
            }
        }

        let ring = Arc::new(self.build_ring(candidates));
        *self.ring_cache.write() = Some((candidates.to_vec(), ring.clone()));
        trace!(candidates = candidates.len(), points = ring.len(), "Hash ring rebuilt");
        ring
    }

    /// Ring mapping hash points to candidate indices
    fn build_ring(&self, candidates: &[String]) -> Ring {
        let mut ring = BTreeMap::new();
        for (idx, name) in candidates.iter().enumerate() {
            for vn in 0..self.virtual_nodes {
                let key = format!("{}:{}", name, vn);
                ring.insert(Self::hash_bytes(key.as_bytes()), idx);
            }
        }
        ring
    }

    /// First node at or after `hash`, wrapping around to the start
    fn find_in_ring(ring: &Ring, hash: u64) -> Option<usize> {
        ring.range(hash..)
            .next()
            .or_else(|| ring.iter().next())
            .map(|(_, &idx)| idx)
    }
}

impl Default for ConsistentHashShardingAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleKeyShardingAlgorithm for ConsistentHashShardingAlgorithm {
    fn equal(&self, candidates: &[String], column: &str, value: &Value) -> Result<Vec<String>, StrategyError> {
        if candidates.len() <= 1 {
            return Ok(retain_candidates(candidates, |_| true));
        }

        let ring = self.get_or_build_ring(candidates);
        let hash = Self::hash_bytes(&value.to_bytes());
        trace!(column = %column, value = %value, hash = %hash, "Consistent hash lookup");

        Ok(Self::find_in_ring(&ring, hash)
            .map(|idx| vec![candidates[idx].clone()])
            .unwrap_or_default())
    }

    /// Hashing destroys order, so a range reaches every candidate
    fn between(
        &self,
        candidates: &[String],
        _column: &str,
        _lower: &Value,
        _upper: &Value,
    ) -> Result<Vec<String>, StrategyError> {
        Ok(retain_candidates(candidates, |_| true))
    }

    fn name(&self) -> &'static str {
        "ConsistentHash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidates(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("ds{}", i)).collect()
    }

    impl ConsistentHashShardingAlgorithm {
        /// Uncached lookup
        fn build_ring_lookup(&self, candidates: &[String], key: &Value) -> Vec<String> {
            let ring = self.build_ring(candidates);
            Self::find_in_ring(&ring, Self::hash_bytes(&key.to_bytes()))
                .map(|idx| vec![candidates[idx].clone()])
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_consistent_hash_deterministic() {
        let algorithm = ConsistentHashShardingAlgorithm::default();
        let candidates = create_candidates(6);

        let result1 = algorithm.equal(&candidates, "tenant", &Value::from("alice")).unwrap();
        let result2 = algorithm.equal(&candidates, "tenant", &Value::from("alice")).unwrap();

        assert_eq!(result1.len(), 1);
        assert_eq!(result1, result2, "Same key should route to same candidate");
    }

    #[test]
    fn test_consistent_hash_distribution() {
        let algorithm = ConsistentHashShardingAlgorithm::default();
        let candidates = create_candidates(6);

        let mut distribution = std::collections::HashMap::new();

        for i in 0..1000 {
            let key = Value::from(format!("resource:{}", i));
            let result = algorithm.equal(&candidates, "tenant", &key).unwrap();
            *distribution.entry(result[0].clone()).or_insert(0) += 1;
        }

        // All 6 candidates should receive traffic
        assert_eq!(distribution.len(), 6);

        // Check reasonable distribution (each gets roughly 10-30%)
        for count in distribution.values() {
            assert!(*count > 50 && *count < 300, "count={} is outside expected range", count);
        }
    }

    #[test]
    fn test_adding_candidate_moves_few_keys() {
        let algorithm = ConsistentHashShardingAlgorithm::default();
        let before = create_candidates(5);
        let after = create_candidates(6);

        let moved = (0..1000)
            .filter(|i| {
                let key = Value::Int(*i);
                algorithm.equal(&before, "id", &key).unwrap() != algorithm.equal(&after, "id", &key).unwrap()
            })
            .count();

        assert!(moved < 400, "moved={} keys, expected roughly 1/6", moved);
    }

    #[test]
    fn test_ring_cache_follows_candidates() {
        let algorithm = ConsistentHashShardingAlgorithm::default();
        let fresh = ConsistentHashShardingAlgorithm::default();
        let first = create_candidates(4);
        let second = create_candidates(7);

        for i in 0..200 {
            let key = Value::Int(i);
            // Alternate lists so every lookup after the first swaps the cached ring
            let candidates = if i % 2 == 0 { &first } else { &second };
            assert_eq!(
                algorithm.equal(candidates, "id", &key).unwrap(),
                fresh.build_ring_lookup(candidates, &key)
            );
        }

        let cached = algorithm.get_or_build_ring(&second);
        assert!(Arc::ptr_eq(&cached, &algorithm.get_or_build_ring(&second)));
    }

    #[test]
    fn test_empty_and_single_candidate() {
        let algorithm = ConsistentHashShardingAlgorithm::default();
        assert!(algorithm.equal(&[], "id", &Value::Int(1)).unwrap().is_empty());

        let single = create_candidates(1);
        assert_eq!(algorithm.equal(&single, "id", &Value::Int(1)).unwrap(), vec!["ds0"]);
    }
}
