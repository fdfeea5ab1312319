//! Hash Modulo Sharding Algorithm
//!
//! CRC32 of the value bytes modulo the shard count, matched by numeric
//! suffix. Works for text keys that plain modulo cannot handle.

use crc32fast::Hasher;
use strata_core::Value;

use super::{numeric_suffix, retain_candidates, SingleKeyShardingAlgorithm};
use crate::error::StrategyError;

#[derive(Debug, Clone)]
pub struct HashModShardingAlgorithm {
    shard_count: u64,
}

impl HashModShardingAlgorithm {
    pub fn new(shard_count: u64) -> Self {
        Self { shard_count }
    }

    /// Shard index of a value
    pub fn shard_of(&self, value: &Value) -> Result<u64, StrategyError> {
        if self.shard_count == 0 {
            return Err(StrategyError::InvalidParameter("hash-mod shard count is 0".to_string()));
        }
        let mut hasher = Hasher::new();
        hasher.update(&value.to_bytes());
        Ok(u64::from(hasher.finalize()) % self.shard_count)
    }
}

impl SingleKeyShardingAlgorithm for HashModShardingAlgorithm {
    fn equal(&self, candidates: &[String], _column: &str, value: &Value) -> Result<Vec<String>, StrategyError> {
        let shard = self.shard_of(value)?;
        Ok(retain_candidates(candidates, |name| numeric_suffix(name) == Some(shard)))
    }

    /// Hashing destroys order, so a range reaches every shard
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
        "HashMod"
    }
}
