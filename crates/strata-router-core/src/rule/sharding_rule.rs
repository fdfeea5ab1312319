//! Sharding rule: every table rule plus rule-wide default strategies

use std::collections::HashMap;
use std::sync::Arc;

use strata_core::{Column, Condition, Conditions};
use tracing::trace;

use super::TableRule;
use crate::error::ConfigurationError;
use crate::strategy::{NoneShardingStrategy, ShardingStrategy};

/// Immutable sharding configuration snapshot
#[derive(Debug, Clone)]
pub struct ShardingRule {
    table_rules: Vec<TableRule>,
    /// Lowercased logic table name → index into `table_rules`
    index: HashMap<String, usize>,
    default_database_strategy: Option<Arc<dyn ShardingStrategy>>,
    default_table_strategy: Option<Arc<dyn ShardingStrategy>>,
    none_strategy: Arc<dyn ShardingStrategy>,
}

impl ShardingRule {
    pub fn builder() -> ShardingRuleBuilder {
        ShardingRuleBuilder::default()
    }

    /// Table rule for a logic table, matched ignoring ASCII case
    pub fn table_rule(&self, logic_table: &str) -> Result<&TableRule, ConfigurationError> {
        self.find_table_rule(logic_table)
            .ok_or_else(|| ConfigurationError::UnknownTable(logic_table.to_string()))
    }

    pub fn find_table_rule(&self, logic_table: &str) -> Option<&TableRule> {
        self.index
            .get(&logic_table.to_ascii_lowercase())
            .map(|&idx| &self.table_rules[idx])
    }

    pub fn table_rules(&self) -> &[TableRule] {
        &self.table_rules
    }

    pub fn logic_tables(&self) -> impl Iterator<Item = &str> {
        self.table_rules.iter().map(TableRule::logic_table)
    }

    /// Every data source referenced by any table, in first-seen order
    pub fn data_source_names(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for name in self.table_rules.iter().flat_map(|r| r.actual_data_source_names()) {
            if !result.contains(name) {
                result.push(name.clone());
            }
        }
        result
    }

    /// Database strategy of a table: its own, else the default, else none
    pub fn database_strategy(&self, table_rule: &TableRule) -> Arc<dyn ShardingStrategy> {
        table_rule
            .database_strategy()
            .or(self.default_database_strategy.as_ref())
            .unwrap_or(&self.none_strategy)
            .clone()
    }

    /// Table strategy of a table: its own, else the default, else none
    pub fn table_strategy(&self, table_rule: &TableRule) -> Arc<dyn ShardingStrategy> {
        table_rule
            .table_strategy()
            .or(self.default_table_strategy.as_ref())
            .unwrap_or(&self.none_strategy)
            .clone()
    }

    /// Whether the column feeds the database or table strategy of its table
    pub fn is_sharding_column(&self, column: &Column) -> bool {
        let Some(table_rule) = self.find_table_rule(&column.table_name) else {
            return false;
        };
        let matches = |strategy: Arc<dyn ShardingStrategy>| {
            strategy
                .sharding_columns()
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&column.name))
        };
        matches(self.database_strategy(table_rule)) || matches(self.table_strategy(table_rule))
    }

    /// Add a condition during extraction if it can affect routing
    pub fn add_condition(&self, conditions: &mut Conditions, condition: Condition) -> bool {
        if !self.is_sharding_column(&condition.column) {
            trace!(column = %condition.column, "Skipping condition on non-sharding column");
            return false;
        }
        conditions.add(condition);
        true
    }
}

/// Builder for [`ShardingRule`]
#[derive(Debug, Default)]
pub struct ShardingRuleBuilder {
    table_rules: Vec<TableRule>,
    default_database_strategy: Option<Arc<dyn ShardingStrategy>>,
    default_table_strategy: Option<Arc<dyn ShardingStrategy>>,
}

impl ShardingRuleBuilder {
    pub fn table_rule(mut self, table_rule: TableRule) -> Self {
        self.table_rules.push(table_rule);
        self
    }

    pub fn default_database_strategy(mut self, strategy: Arc<dyn ShardingStrategy>) -> Self {
        self.default_database_strategy = Some(strategy);
        self
    }

    pub fn default_table_strategy(mut self, strategy: Arc<dyn ShardingStrategy>) -> Self {
        self.default_table_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<ShardingRule, ConfigurationError> {
        let mut index = HashMap::with_capacity(self.table_rules.len());
        for (idx, rule) in self.table_rules.iter().enumerate() {
            if index.insert(rule.logic_table().to_ascii_lowercase(), idx).is_some() {
                return Err(ConfigurationError::DuplicateTable(rule.logic_table().to_string()));
            }
        }

        Ok(ShardingRule {
            table_rules: self.table_rules,
            index,
            default_database_strategy: self.default_database_strategy,
            default_table_strategy: self.default_table_strategy,
            none_strategy: Arc::new(NoneShardingStrategy::new()),
        })
    }
}
