//! Sharding rule model
//!
//! `ShardingRule` owns one `TableRule` per logical table. Both are built once
//! (directly or from a `ShardingRuleConfig` document) and then shared
//! read-only by every concurrent routing call.

mod config;
mod data_node;
mod sharding_rule;
mod table_rule;

pub use config::{ShardingRuleConfig, StrategyConfig, TableRuleConfig};
pub use data_node::DataNode;
pub use sharding_rule::{ShardingRule, ShardingRuleBuilder};
pub use table_rule::{TableRule, TableRuleBuilder};
