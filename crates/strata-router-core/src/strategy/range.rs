//! Range Sharding Algorithm
//!
//! Each target name owns one or more inclusive integer ranges. Equality picks
//! the targets whose range contains the value; BETWEEN picks every target
//! whose range overlaps.

use serde::{Deserialize, Serialize};
use strata_core::Value;

use super::{integer_value, retain_candidates, SingleKeyShardingAlgorithm};
use crate::error::StrategyError;

/// Inclusive range owned by a physical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTarget {
    pub lower: i64,
    pub upper: i64,
    pub target: String,
}

impl RangeTarget {
    pub fn new(lower: i64, upper: i64, target: impl Into<String>) -> Self {
        Self {
            lower,
            upper,
            target: target.into(),
        }
    }

    fn overlaps(&self, lower: i64, upper: i64) -> bool {
        self.lower <= upper && lower <= self.upper
    }
}

#[derive(Debug, Clone)]
pub struct RangeShardingAlgorithm {
    ranges: Vec<RangeTarget>,
}

impl RangeShardingAlgorithm {
    pub fn new(ranges: Vec<RangeTarget>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[RangeTarget] {
        &self.ranges
    }

    fn select(&self, candidates: &[String], lower: i64, upper: i64) -> Vec<String> {
        retain_candidates(candidates, |name| {
            self.ranges
                .iter()
                .any(|r| r.target == *name && r.overlaps(lower, upper))
        })
    }
}

impl SingleKeyShardingAlgorithm for RangeShardingAlgorithm {
    fn equal(&self, candidates: &[String], column: &str, value: &Value) -> Result<Vec<String>, StrategyError> {
        let v = integer_value(column, value)?;
        Ok(self.select(candidates, v, v))
    }

    fn between(
        &self,
        candidates: &[String],
        column: &str,
        lower: &Value,
        upper: &Value,
    ) -> Result<Vec<String>, StrategyError> {
        let lower = integer_value(column, lower)?;
        let upper = integer_value(column, upper)?;
        Ok(self.select(candidates, lower, upper))
    }

    fn name(&self) -> &'static str {
        "Range"
    }
}
