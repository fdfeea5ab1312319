//! Strategy for tables that are not sharded on this level

use strata_core::{ShardingValue, SqlType};

use super::{broadcast, ShardingStrategy};
use crate::error::StrategyError;

/// No sharding columns; every call routes to all candidates
#[derive(Debug, Clone, Default)]
pub struct NoneShardingStrategy {
    columns: Vec<String>,
}

impl NoneShardingStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShardingStrategy for NoneShardingStrategy {
    fn sharding_columns(&self) -> &[String] {
        &self.columns
    }

    fn static_sharding(
        &self,
        sql_type: SqlType,
        candidates: &[String],
        _values: &[ShardingValue],
    ) -> Result<Vec<String>, StrategyError> {
        broadcast(sql_type, candidates)
    }

    fn name(&self) -> &'static str {
        "None"
    }
}
