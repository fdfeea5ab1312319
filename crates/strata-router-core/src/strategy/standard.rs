//! Standard single-column strategy
//!
//! Dispatches each sharding value to the algorithm by operator and keeps the
//! candidates every value agrees on.

use std::sync::Arc;

use strata_core::{ShardingValue, ShardingValueKind, SqlType};
use tracing::trace;

use super::{broadcast, intersect_all, ShardingStrategy, SingleKeyShardingAlgorithm};
use crate::error::StrategyError;

/// Strategy over one sharding column backed by a single-key algorithm
#[derive(Debug, Clone)]
pub struct StandardShardingStrategy {
    columns: Vec<String>,
    algorithm: Arc<dyn SingleKeyShardingAlgorithm>,
}

impl StandardShardingStrategy {
    pub fn new(column: impl Into<String>, algorithm: Arc<dyn SingleKeyShardingAlgorithm>) -> Self {
        Self {
            columns: vec![column.into()],
            algorithm,
        }
    }

    pub fn column(&self) -> &str {
        &self.columns[0]
    }

    fn evaluate(&self, candidates: &[String], value: &ShardingValue) -> Result<Vec<String>, StrategyError> {
        let column = value.column.as_str();
        match &value.kind {
            ShardingValueKind::Single(v) => self.algorithm.equal(candidates, column, v),
            ShardingValueKind::List(values) => self.algorithm.in_list(candidates, column, values),
            ShardingValueKind::Range { lower, upper } => self.algorithm.between(candidates, column, lower, upper),
        }
    }
}

impl ShardingStrategy for StandardShardingStrategy {
    fn sharding_columns(&self) -> &[String] {
        &self.columns
    }

    fn static_sharding(
        &self,
        sql_type: SqlType,
        candidates: &[String],
        values: &[ShardingValue],
    ) -> Result<Vec<String>, StrategyError> {
        if values.is_empty() {
            return broadcast(sql_type, candidates);
        }

        let selections = values
            .iter()
            .map(|value| self.evaluate(candidates, value))
            .collect::<Result<Vec<_>, _>>()?;
        let result = intersect_all(selections);

        trace!(
            algorithm = self.algorithm.name(),
            candidates = candidates.len(),
            selected = result.len(),
            "Standard sharding evaluated"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ModuloShardingAlgorithm;

    fn strategy() -> StandardShardingStrategy {
        StandardShardingStrategy::new("user_id", Arc::new(ModuloShardingAlgorithm::new(2)))
    }

    fn tables() -> Vec<String> {
        vec!["orders_0".to_string(), "orders_1".to_string()]
    }

    #[test]
    fn test_equal_selects_one() {
        let values = [ShardingValue::single("orders", "user_id", 5)];
        let result = strategy().static_sharding(SqlType::Select, &tables(), &values).unwrap();
        assert_eq!(result, vec!["orders_1"]);
    }

    #[test]
    fn test_no_values_broadcasts() {
        let result = strategy().static_sharding(SqlType::Select, &tables(), &[]).unwrap();
        assert_eq!(result, tables());
    }

    #[test]
    fn test_insert_without_value_fails() {
        let result = strategy().static_sharding(SqlType::Insert, &tables(), &[]);
        assert_eq!(result, Err(StrategyError::InsertWithoutShardingValue));
    }

    #[test]
    fn test_values_are_intersected() {
        let values = [
            ShardingValue::list("orders", "user_id", [1, 2]),
            ShardingValue::single("orders", "user_id", 4),
        ];
        let result = strategy().static_sharding(SqlType::Select, &tables(), &values).unwrap();
        assert_eq!(result, vec!["orders_0"]);
    }

    #[test]
    fn test_algorithm_errors_propagate() {
        let values = [ShardingValue::single("orders", "user_id", "abc")];
        let result = strategy().static_sharding(SqlType::Select, &tables(), &values);
        assert!(matches!(result, Err(StrategyError::NotAnInteger { .. })));
    }
}
