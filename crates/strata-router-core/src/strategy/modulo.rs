//! Modulo Sharding Algorithm
//!
//! Routes an integer value to the candidate whose numeric suffix equals
//! `value mod shard_count`, e.g. `user_id = 5` with 2 shards → `orders_1`.

use strata_core::Value;

use super::{integer_value, numeric_suffix, retain_candidates, SingleKeyShardingAlgorithm};
use crate::error::StrategyError;

/// Integer modulo algorithm matched by numeric name suffix
#[derive(Debug, Clone)]
pub struct ModuloShardingAlgorithm {
    shard_count: u64,
}

impl ModuloShardingAlgorithm {
    /// `shard_count` of zero is rejected when the rule is built
    pub fn new(shard_count: u64) -> Self {
        Self { shard_count }
    }

    pub fn shard_count(&self) -> u64 {
        self.shard_count
    }

    /// Modulus widened so every `u64` shard count divides every `i64` value
    fn modulus(&self) -> Result<i128, StrategyError> {
        if self.shard_count == 0 {
            return Err(StrategyError::InvalidParameter("modulo shard count is 0".to_string()));
        }
        Ok(self.shard_count as i128)
    }

    fn residue(&self, value: i64) -> Result<i128, StrategyError> {
        Ok((value as i128).rem_euclid(self.modulus()?))
    }
}

impl SingleKeyShardingAlgorithm for ModuloShardingAlgorithm {
    fn equal(&self, candidates: &[String], column: &str, value: &Value) -> Result<Vec<String>, StrategyError> {
        let residue = self.residue(integer_value(column, value)?)?;
        Ok(retain_candidates(candidates, |name| {
            numeric_suffix(name).map_or(false, |suffix| suffix as i128 == residue)
        }))
    }

    /// A suffix is hit when some value in the range has it as residue
    fn between(
        &self,
        candidates: &[String],
        column: &str,
        lower: &Value,
        upper: &Value,
    ) -> Result<Vec<String>, StrategyError> {
        let modulus = self.modulus()?;
        let lower = integer_value(column, lower)? as i128;
        let upper = integer_value(column, upper)? as i128;
        if lower > upper {
            return Ok(Vec::new());
        }

        let first = lower.rem_euclid(modulus);
        let span = upper - lower;
        Ok(retain_candidates(candidates, |name| {
            numeric_suffix(name).map_or(false, |suffix| {
                let suffix = suffix as i128;
                suffix < modulus && (suffix - first).rem_euclid(modulus) <= span
            })
        }))
    }

    fn name(&self) -> &'static str {
        "Modulo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("orders_{}", i)).collect()
    }

    #[test]
    fn test_equal() {
        let algorithm = ModuloShardingAlgorithm::new(4);
        let result = algorithm.equal(&tables(4), "user_id", &Value::Int(7)).unwrap();
        assert_eq!(result, vec!["orders_3"]);
    }

    #[test]
    fn test_negative_values_wrap() {
        let algorithm = ModuloShardingAlgorithm::new(4);
        let result = algorithm.equal(&tables(4), "user_id", &Value::Int(-1)).unwrap();
        assert_eq!(result, vec!["orders_3"]);
    }

    #[test]
    fn test_suffix_is_matched_exactly() {
        let algorithm = ModuloShardingAlgorithm::new(16);
        let result = algorithm.equal(&tables(12), "user_id", &Value::Int(1)).unwrap();
        assert_eq!(result, vec!["orders_1"]);
    }

    #[test]
    fn test_numeric_text_is_accepted() {
        let algorithm = ModuloShardingAlgorithm::new(2);
        let result = algorithm.equal(&tables(2), "user_id", &Value::from("10")).unwrap();
        assert_eq!(result, vec!["orders_0"]);
    }

    #[test]
    fn test_in_list_unions() {
        let algorithm = ModuloShardingAlgorithm::new(4);
        let result = algorithm
            .in_list(&tables(4), "user_id", &[Value::Int(2), Value::Int(5), Value::Int(6)])
            .unwrap();
        assert_eq!(result, vec!["orders_1", "orders_2"]);
    }

    #[test]
    fn test_between() {
        let algorithm = ModuloShardingAlgorithm::new(4);
        let narrow = algorithm.between(&tables(4), "user_id", &Value::Int(5), &Value::Int(6)).unwrap();
        assert_eq!(narrow, vec!["orders_1", "orders_2"]);

        let wide = algorithm.between(&tables(4), "user_id", &Value::Int(0), &Value::Int(100)).unwrap();
        assert_eq!(wide, tables(4));

        let inverted = algorithm.between(&tables(4), "user_id", &Value::Int(9), &Value::Int(1)).unwrap();
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_shard_count_beyond_i64() {
        let algorithm = ModuloShardingAlgorithm::new(u64::MAX);
        let candidates = vec!["t_0".to_string(), "t_5".to_string(), format!("t_{}", i64::MAX)];

        assert_eq!(algorithm.equal(&candidates, "id", &Value::Int(5)).unwrap(), vec!["t_5"]);
        // i64::MIN mod (2^64 - 1) is 2^63 - 1
        assert_eq!(
            algorithm.equal(&candidates, "id", &Value::Int(i64::MIN)).unwrap(),
            vec![format!("t_{}", i64::MAX)]
        );
        assert_eq!(
            algorithm.between(&candidates, "id", &Value::Int(i64::MIN), &Value::Int(i64::MAX)).unwrap(),
            candidates
        );
    }

    #[test]
    fn test_narrow_range_under_large_modulus() {
        let algorithm = ModuloShardingAlgorithm::new(1_000_000_000_000);
        let candidates: Vec<String> = (8..14).map(|i| format!("t_{}", i)).collect();

        let result = algorithm.between(&candidates, "id", &Value::Int(10), &Value::Int(12)).unwrap();
        assert_eq!(result, vec!["t_10", "t_11", "t_12"]);

        let wrapped = algorithm
            .between(&candidates, "id", &Value::Int(1_000_000_000_009), &Value::Int(1_000_000_000_011))
            .unwrap();
        assert_eq!(wrapped, vec!["t_9", "t_10", "t_11"]);
    }

    #[test]
    fn test_zero_shard_count() {
        let algorithm = ModuloShardingAlgorithm::new(0);
        let result = algorithm.equal(&tables(2), "user_id", &Value::Int(1));
        assert!(matches!(result, Err(StrategyError::InvalidParameter(_))));
    }
}
