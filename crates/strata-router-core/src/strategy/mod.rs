//! Sharding Strategies
//!
//! A strategy maps the sharding values gathered for a table onto physical
//! names. This module contains:
//!
//! - `NoneShardingStrategy`: no sharding columns, always broadcasts
//! - `StandardShardingStrategy`: one column evaluated by a `SingleKeyShardingAlgorithm`
//! - `BucketDynamicStrategy`: generates `{prefix}{value / bucket_size}` names
//! - `TemplateDynamicStrategy`: substitutes values into a name template
//!
//! Single-key algorithms:
//!
//! - `ModuloShardingAlgorithm`: integer value mod N, matched by numeric suffix
//! - `HashModShardingAlgorithm`: CRC32 of the value mod N, matched by numeric suffix
//! - `ConsistentHashShardingAlgorithm`: blake3 hash ring over the candidate names
//! - `RangeShardingAlgorithm`: configured inclusive ranges mapped to names
//!
//! # Static vs dynamic
//!
//! ```text
//! static:   candidates ──► filter by values ──► subset of candidates
//! dynamic:  values ──────► compute names ─────► generated names
//! ```
//!
//! Strategies are configuration: built once, shared as `Arc<dyn ShardingStrategy>`
//! and never mutated, so every call is a pure function of its arguments.

mod bucket;
mod consistent_hash;
mod hash_mod;
mod modulo;
mod none;
mod range;
mod standard;
mod template;

pub use bucket::{BucketDynamicStrategy, DEFAULT_MAX_RANGE_BUCKETS};
pub use consistent_hash::ConsistentHashShardingAlgorithm;
pub use hash_mod::HashModShardingAlgorithm;
pub use modulo::ModuloShardingAlgorithm;
pub use none::NoneShardingStrategy;
pub use range::{RangeShardingAlgorithm, RangeTarget};
pub use standard::StandardShardingStrategy;
pub use template::{TemplateDynamicStrategy, TEMPLATE_PLACEHOLDER};

use std::collections::HashSet;
use std::fmt;

use strata_core::{ShardingValue, ShardingValueKind, SqlType, Value};

use crate::error::StrategyError;

/// Trait for database and table sharding strategies
pub trait ShardingStrategy: Send + Sync + fmt::Debug {
    /// Columns whose values this strategy consumes, in declaration order
    fn sharding_columns(&self) -> &[String];

    /// Select the candidates consistent with `values`; no values means all of them
    fn static_sharding(
        &self,
        sql_type: SqlType,
        candidates: &[String],
        values: &[ShardingValue],
    ) -> Result<Vec<String>, StrategyError>;

    /// Compute physical names from `values` alone
    fn dynamic_sharding(&self, _values: &[ShardingValue]) -> Result<Vec<String>, StrategyError> {
        Err(StrategyError::DynamicUnsupported(self.name()))
    }

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Algorithm over a single sharding column
pub trait SingleKeyShardingAlgorithm: Send + Sync + fmt::Debug {
    /// Candidates matching `column = value`
    fn equal(&self, candidates: &[String], column: &str, value: &Value) -> Result<Vec<String>, StrategyError>;

    /// Candidates matching `column IN (values)`
    fn in_list(&self, candidates: &[String], column: &str, values: &[Value]) -> Result<Vec<String>, StrategyError> {
        let mut selected = HashSet::new();
        for value in values {
            selected.extend(self.equal(candidates, column, value)?);
        }
        Ok(retain_candidates(candidates, |c| selected.contains(c)))
    }

    /// Candidates matching `column BETWEEN lower AND upper`
    fn between(
        &self,
        candidates: &[String],
        column: &str,
        lower: &Value,
        upper: &Value,
    ) -> Result<Vec<String>, StrategyError>;

    /// Algorithm name for logging
    fn name(&self) -> &'static str;
}

/// Every candidate, unless an INSERT would fan out to several of them
pub(crate) fn broadcast(sql_type: SqlType, candidates: &[String]) -> Result<Vec<String>, StrategyError> {
    if sql_type == SqlType::Insert && candidates.len() > 1 {
        return Err(StrategyError::InsertWithoutShardingValue);
    }
    Ok(retain_candidates(candidates, |_| true))
}

/// Candidates passing `keep`, deduplicated, in candidate order
pub(crate) fn retain_candidates(candidates: &[String], mut keep: impl FnMut(&String) -> bool) -> Vec<String> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|c| keep(*c) && seen.insert(c.as_str()))
        .cloned()
        .collect()
}

/// Names present in every selection, in the order of the first one
pub(crate) fn intersect_all(mut selections: Vec<Vec<String>>) -> Vec<String> {
    if selections.is_empty() {
        return Vec::new();
    }
    let first = selections.remove(0);
    let rest: Vec<HashSet<String>> = selections.into_iter().map(|s| s.into_iter().collect()).collect();
    retain_candidates(&first, |name| rest.iter().all(|set| set.contains(name)))
}

/// Trailing decimal digits of a physical name, e.g. `orders_12` -> 12
pub(crate) fn numeric_suffix(name: &str) -> Option<u64> {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    name[name.len() - digits..].parse().ok()
}

pub(crate) fn integer_value(column: &str, value: &Value) -> Result<i64, StrategyError> {
    value.as_i64().ok_or_else(|| StrategyError::NotAnInteger {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Names generated for one sharding value by a name-computing strategy
pub(crate) fn generate_for_value(
    value: &ShardingValue,
    mut single: impl FnMut(&Value) -> Result<String, StrategyError>,
    range: impl FnOnce(&Value, &Value) -> Result<Vec<String>, StrategyError>,
) -> Result<Vec<String>, StrategyError> {
    match &value.kind {
        ShardingValueKind::Single(v) => Ok(vec![single(v)?]),
        ShardingValueKind::List(values) => {
            let mut names = Vec::with_capacity(values.len());
            for v in values {
                let name = single(v)?;
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            Ok(names)
        }
        ShardingValueKind::Range { lower, upper } => range(lower, upper),
    }
}
