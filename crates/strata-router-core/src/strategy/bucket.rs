//! Bucket Dynamic Strategy
//!
//! Tables are created on demand, one per bucket of `bucket_size` consecutive
//! integer values: `{prefix}{value / bucket_size}`. The table set is
//! unbounded, so names are computed instead of filtered.

use strata_core::{ShardingValue, SqlType};
use tracing::trace;

use super::{broadcast, generate_for_value, integer_value, intersect_all, retain_candidates, ShardingStrategy};
use crate::error::StrategyError;

/// Default cap on how many buckets a single range may expand to
pub const DEFAULT_MAX_RANGE_BUCKETS: u64 = 1024;

#[derive(Debug, Clone)]
pub struct BucketDynamicStrategy {
    columns: Vec<String>,
    prefix: String,
    bucket_size: u64,
    max_range_buckets: u64,
}

impl BucketDynamicStrategy {
    pub fn new(column: impl Into<String>, prefix: impl Into<String>, bucket_size: u64) -> Self {
        Self {
            columns: vec![column.into()],
            prefix: prefix.into(),
            bucket_size,
            max_range_buckets: DEFAULT_MAX_RANGE_BUCKETS,
        }
    }

    pub fn with_max_range_buckets(mut self, max_range_buckets: u64) -> Self {
        self.max_range_buckets = max_range_buckets;
        self
    }

    /// Widened so any `u64` bucket size divides any `i64` value
    fn bucket(&self, value: i64) -> Result<i128, StrategyError> {
        if self.bucket_size == 0 {
            return Err(StrategyError::InvalidParameter("bucket size is 0".to_string()));
        }
        Ok((value as i128).div_euclid(self.bucket_size as i128))
    }

    fn table_name(&self, bucket: i128) -> String {
        format!("{}{}", self.prefix, bucket)
    }

    fn generate(&self, values: &[ShardingValue]) -> Result<Vec<String>, StrategyError> {
        let selections = values
            .iter()
            .map(|value| {
                let column = value.column.as_str();
                generate_for_value(
                    value,
                    |v| Ok(self.table_name(self.bucket(integer_value(column, v)?)?)),
                    |lower, upper| {
                        let lower_value = integer_value(column, lower)?;
                        let upper_value = integer_value(column, upper)?;
                        if lower_value > upper_value {
                            return Ok(Vec::new());
                        }
                        let first = self.bucket(lower_value)?;
                        let last = self.bucket(upper_value)?;
                        if last - first + 1 > self.max_range_buckets as i128 {
                            return Err(StrategyError::RangeTooWide {
                                lower: lower_value,
                                upper: upper_value,
                                limit: self.max_range_buckets,
                            });
                        }
                        Ok((first..=last).map(|b| self.table_name(b)).collect())
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(intersect_all(selections))
    }
}

impl ShardingStrategy for BucketDynamicStrategy {
    fn sharding_columns(&self) -> &[String] {
        &self.columns
    }

    /// Generated names that also exist among the candidates
    fn static_sharding(
        &self,
        sql_type: SqlType,
        candidates: &[String],
        values: &[ShardingValue],
    ) -> Result<Vec<String>, StrategyError> {
        if values.is_empty() {
            return broadcast(sql_type, candidates);
        }
        let generated = self.generate(values)?;
        Ok(retain_candidates(candidates, |name| generated.contains(name)))
    }

    /// Without a value there is no bounded set of tables to reach, so this fails
    fn dynamic_sharding(&self, values: &[ShardingValue]) -> Result<Vec<String>, StrategyError> {
        if values.is_empty() {
            return Err(StrategyError::MissingShardingValue { strategy: self.name() });
        }
        let result = self.generate(values)?;
        trace!(prefix = %self.prefix, generated = result.len(), "Bucket tables generated");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Bucket"
    }
}
