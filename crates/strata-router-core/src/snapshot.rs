//! Rule snapshots
//!
//! The active `ShardingRule` is published as an `Arc`. Routing calls take a
//! clone of the current `Arc` and keep it for the whole query, so a reload
//! swaps in a new rule without any query observing a half-updated one.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::error::ConfigurationError;
use crate::rule::{ShardingRule, ShardingRuleConfig};

/// Holder of the currently published sharding rule
#[derive(Debug)]
pub struct RuleSnapshot {
    current: RwLock<Arc<ShardingRule>>,
}

impl RuleSnapshot {
    pub fn new(rule: ShardingRule) -> Self {
        Self {
            current: RwLock::new(Arc::new(rule)),
        }
    }

    /// Build the initial snapshot from a rule document
    pub fn from_config(config: &ShardingRuleConfig) -> Result<Self, ConfigurationError> {
        Ok(Self::new(config.build()?))
    }

    /// Current rule; stays valid even if a newer one is published meanwhile
    pub fn load(&self) -> Arc<ShardingRule> {
        self.current.read().clone()
    }

    /// Atomically replace the current rule
    pub fn publish(&self, rule: ShardingRule) -> Arc<ShardingRule> {
        let rule = Arc::new(rule);
        let previous = std::mem::replace(&mut *self.current.write(), rule.clone());
        info!(
            tables = rule.table_rules().len(),
            previous_tables = previous.table_rules().len(),
            "Published new sharding rule"
        );
        previous
    }

    /// Rebuild from a rule document and publish; the old rule stays on failure
    pub fn reload(&self, config: &ShardingRuleConfig) -> Result<Arc<ShardingRule>, ConfigurationError> {
        let rule = config.build()?;
        Ok(self.publish(rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::TableRule;

    fn rule_with(tables: &[&str]) -> ShardingRule {
        tables
            .iter()
            .fold(ShardingRule::builder(), |builder, table| {
                builder.table_rule(
                    TableRule::builder(*table)
                        .actual_tables(&["ds0"], &[*table])
                        .build()
                        .unwrap(),
                )
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_loaded_snapshot_survives_publish() {
        let snapshot = RuleSnapshot::new(rule_with(&["orders"]));
        let in_flight = snapshot.load();

        let previous = snapshot.publish(rule_with(&["orders", "users"]));

        assert!(Arc::ptr_eq(&in_flight, &previous));
        assert!(in_flight.find_table_rule("users").is_none());
        assert!(snapshot.load().find_table_rule("users").is_some());
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let snapshot = RuleSnapshot::new(rule_with(&["orders"]));
        let bad = ShardingRuleConfig::from_json(
            r#"{ "tables": [ { "logic_table": "a", "actual_data_nodes": ["nonsense"] } ] }"#,
        )
        .unwrap();

        assert!(snapshot.reload(&bad).is_err());
        assert!(snapshot.load().find_table_rule("orders").is_some());
    }
}
