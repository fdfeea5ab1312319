//! Rule configuration documents
//!
//! JSON shape of a sharding rule, turned into an immutable [`ShardingRule`]
//! once at startup (or on an explicit reload).
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "logic_table": "orders",
//!       "data_sources": ["ds0", "ds1"],
//!       "actual_tables": ["orders_0", "orders_1"],
//!       "database_strategy": { "type": "modulo", "column": "user_id", "shard_count": 2 },
//!       "table_strategy": { "type": "modulo", "column": "user_id", "shard_count": 2 }
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{DataNode, ShardingRule, TableRule};
use crate::error::ConfigurationError;
use crate::strategy::{
    BucketDynamicStrategy, ConsistentHashShardingAlgorithm, HashModShardingAlgorithm, ModuloShardingAlgorithm,
    NoneShardingStrategy, RangeShardingAlgorithm, RangeTarget, ShardingStrategy, SingleKeyShardingAlgorithm,
    StandardShardingStrategy, TemplateDynamicStrategy, TEMPLATE_PLACEHOLDER,
};

fn default_virtual_nodes() -> u32 {
    150
}

/// One sharding strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    None,
    Modulo {
        column: String,
        shard_count: u64,
    },
    HashMod {
        column: String,
        shard_count: u64,
    },
    ConsistentHash {
        column: String,
        #[serde(default = "default_virtual_nodes")]
        virtual_nodes: u32,
    },
    Range {
        column: String,
        ranges: Vec<RangeTarget>,
    },
    Bucket {
        column: String,
        prefix: String,
        bucket_size: u64,
        #[serde(default)]
        max_range_buckets: Option<u64>,
    },
    Template {
        column: String,
        template: String,
    },
}

impl StrategyConfig {
    pub fn build(&self) -> Result<Arc<dyn ShardingStrategy>, ConfigurationError> {
        let strategy: Arc<dyn ShardingStrategy> = match self {
            StrategyConfig::None => Arc::new(NoneShardingStrategy::new()),
            StrategyConfig::Modulo { column, shard_count } => {
                require_positive("modulo shard_count", *shard_count)?;
                standard(column, Arc::new(ModuloShardingAlgorithm::new(*shard_count)))
            }
            StrategyConfig::HashMod { column, shard_count } => {
                require_positive("hash_mod shard_count", *shard_count)?;
                standard(column, Arc::new(HashModShardingAlgorithm::new(*shard_count)))
            }
            StrategyConfig::ConsistentHash { column, virtual_nodes } => standard(
                column,
                Arc::new(ConsistentHashShardingAlgorithm::with_virtual_nodes(*virtual_nodes)),
            ),
            StrategyConfig::Range { column, ranges } => {
                if let Some(bad) = ranges.iter().find(|r| r.lower > r.upper) {
                    return Err(ConfigurationError::Invalid(format!(
                        "range {}..={} for {} is inverted",
                        bad.lower, bad.upper, bad.target
                    )));
                }
                standard(column, Arc::new(RangeShardingAlgorithm::new(ranges.clone())))
            }
            StrategyConfig::Bucket {
                column,
                prefix,
                bucket_size,
                max_range_buckets,
            } => {
                require_positive("bucket_size", *bucket_size)?;
                let mut strategy = BucketDynamicStrategy::new(column, prefix, *bucket_size);
                if let Some(max) = max_range_buckets {
                    strategy = strategy.with_max_range_buckets(*max);
                }
                Arc::new(strategy)
            }
            StrategyConfig::Template { column, template } => {
                if !template.contains(TEMPLATE_PLACEHOLDER) {
                    return Err(ConfigurationError::Invalid(format!(
                        "template {} has no {{}} placeholder",
                        template
                    )));
                }
                Arc::new(TemplateDynamicStrategy::new(column, template))
            }
        };
        Ok(strategy)
    }
}

fn standard(column: &str, algorithm: Arc<dyn SingleKeyShardingAlgorithm>) -> Arc<dyn ShardingStrategy> {
    Arc::new(StandardShardingStrategy::new(column, algorithm))
}

fn require_positive(what: &str, value: u64) -> Result<(), ConfigurationError> {
    if value == 0 {
        return Err(ConfigurationError::Invalid(format!("{} must be positive", what)));
    }
    Ok(())
}

/// One logical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRuleConfig {
    pub logic_table: String,

    /// Explicit inventory as `data_source.table`
    #[serde(default)]
    pub actual_data_nodes: Vec<String>,

    /// With `actual_tables`: every table in every data source.
    /// With `dynamic`: the data sources generated tables live in.
    #[serde(default)]
    pub data_sources: Vec<String>,

    #[serde(default)]
    pub actual_tables: Vec<String>,

    #[serde(default)]
    pub dynamic: bool,

    #[serde(default)]
    pub database_strategy: Option<StrategyConfig>,

    #[serde(default)]
    pub table_strategy: Option<StrategyConfig>,
}

impl TableRuleConfig {
    pub fn build(&self) -> Result<TableRule, ConfigurationError> {
        let mut builder = TableRule::builder(&self.logic_table);

        if self.dynamic {
            if !self.actual_tables.is_empty() || !self.actual_data_nodes.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "dynamic table {} cannot list actual tables",
                    self.logic_table
                )));
            }
            builder = builder.dynamic(self.data_sources.as_slice());
        } else {
            let nodes = self
                .actual_data_nodes
                .iter()
                .map(|n| n.parse::<DataNode>())
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.actual_data_nodes(nodes);

            match (self.data_sources.is_empty(), self.actual_tables.is_empty()) {
                (false, false) => {
                    builder = builder.actual_tables(self.data_sources.as_slice(), self.actual_tables.as_slice())
                }
                (true, true) => {}
                _ => {
                    return Err(ConfigurationError::Invalid(format!(
                        "table {} needs both data_sources and actual_tables",
                        self.logic_table
                    )))
                }
            }
        }

        if let Some(strategy) = &self.database_strategy {
            builder = builder.database_strategy(strategy.build()?);
        }
        if let Some(strategy) = &self.table_strategy {
            builder = builder.table_strategy(strategy.build()?);
        }
        builder.build()
    }
}

/// Whole rule document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShardingRuleConfig {
    pub tables: Vec<TableRuleConfig>,

    #[serde(default)]
    pub default_database_strategy: Option<StrategyConfig>,

    #[serde(default)]
    pub default_table_strategy: Option<StrategyConfig>,
}

impl ShardingRuleConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    pub fn build(&self) -> Result<ShardingRule, ConfigurationError> {
        let mut builder = ShardingRule::builder();
        for table in &self.tables {
            builder = builder.table_rule(table.build()?);
        }
        if let Some(strategy) = &self.default_database_strategy {
            builder = builder.default_database_strategy(strategy.build()?);
        }
        if let Some(strategy) = &self.default_table_strategy {
            builder = builder.default_table_strategy(strategy.build()?);
        }
        let rule = builder.build()?;
        debug!(tables = rule.table_rules().len(), "Sharding rule built");
        Ok(rule)
    }
}
