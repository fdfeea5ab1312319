//! Table rule: the sharding configuration of one logical table

use std::collections::HashSet;
use std::sync::Arc;

use super::DataNode;
use crate::error::ConfigurationError;
use crate::strategy::ShardingStrategy;

/// Sharding configuration of one logical table
///
/// Immutable once built and shared read-only by every routing call.
#[derive(Debug, Clone)]
pub struct TableRule {
    logic_table: String,
    dynamic: bool,
    data_sources: Vec<String>,
    /// Physical inventory in declaration order; empty for dynamic tables
    data_nodes: Vec<DataNode>,
    database_strategy: Option<Arc<dyn ShardingStrategy>>,
    table_strategy: Option<Arc<dyn ShardingStrategy>>,
}

impl TableRule {
    pub fn builder(logic_table: impl Into<String>) -> TableRuleBuilder {
        TableRuleBuilder::new(logic_table)
    }

    pub fn logic_table(&self) -> &str {
        &self.logic_table
    }

    /// Whether actual tables are generated by the table strategy
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Actual data source names, deduplicated, in declaration order
    pub fn actual_data_source_names(&self) -> &[String] {
        &self.data_sources
    }

    /// Full physical inventory
    pub fn data_nodes(&self) -> &[DataNode] {
        &self.data_nodes
    }

    /// Actual table names living in any of `data_sources`, deduplicated
    pub fn actual_table_names(&self, data_sources: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        self.data_nodes
            .iter()
            .filter(|node| data_sources.contains(&node.data_source))
            .filter(|node| seen.insert(node.table.as_str()))
            .map(|node| node.table.clone())
            .collect()
    }

    /// Data nodes selected by both routed sets
    ///
    /// Static tables scan the inventory, so combinations that do not
    /// physically exist are dropped. Dynamic tables have no inventory and
    /// pair every routed data source with every generated table.
    pub fn actual_data_nodes(&self, data_sources: &[String], tables: &[String]) -> Vec<DataNode> {
        if self.dynamic {
            return self
                .data_sources
                .iter()
                .filter(|ds| data_sources.contains(ds))
                .flat_map(|ds| tables.iter().map(move |table| DataNode::new(ds.clone(), table.clone())))
                .collect();
        }
        self.data_nodes
            .iter()
            .filter(|node| data_sources.contains(&node.data_source) && tables.contains(&node.table))
            .cloned()
            .collect()
    }

    pub fn database_strategy(&self) -> Option<&Arc<dyn ShardingStrategy>> {
        self.database_strategy.as_ref()
    }

    pub fn table_strategy(&self) -> Option<&Arc<dyn ShardingStrategy>> {
        self.table_strategy.as_ref()
    }
}

/// Builder for [`TableRule`]
#[derive(Debug)]
pub struct TableRuleBuilder {
    logic_table: String,
    data_nodes: Vec<DataNode>,
    dynamic_data_sources: Option<Vec<String>>,
    database_strategy: Option<Arc<dyn ShardingStrategy>>,
    table_strategy: Option<Arc<dyn ShardingStrategy>>,
}

impl TableRuleBuilder {
    fn new(logic_table: impl Into<String>) -> Self {
        Self {
            logic_table: logic_table.into(),
            data_nodes: Vec::new(),
            dynamic_data_sources: None,
            database_strategy: None,
            table_strategy: None,
        }
    }

    /// Explicit physical inventory
    pub fn actual_data_nodes(mut self, nodes: impl IntoIterator<Item = DataNode>) -> Self {
        self.data_nodes.extend(nodes);
        self
    }

    /// Every table in every data source
    pub fn actual_tables<D, T>(mut self, data_sources: &[D], tables: &[T]) -> Self
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        for ds in data_sources {
            for table in tables {
                self.data_nodes.push(DataNode::new(ds.as_ref(), table.as_ref()));
            }
        }
        self
    }

    /// Tables are generated by the table strategy inside these data sources
    pub fn dynamic<D: AsRef<str>>(mut self, data_sources: &[D]) -> Self {
        self.dynamic_data_sources = Some(data_sources.iter().map(|ds| ds.as_ref().to_string()).collect());
        self
    }

    pub fn database_strategy(mut self, strategy: Arc<dyn ShardingStrategy>) -> Self {
        self.database_strategy = Some(strategy);
        self
    }

    pub fn table_strategy(mut self, strategy: Arc<dyn ShardingStrategy>) -> Self {
        self.table_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<TableRule, ConfigurationError> {
        if self.logic_table.trim().is_empty() {
            return Err(ConfigurationError::Invalid("logic table name is empty".to_string()));
        }

        let (dynamic, data_sources) = match self.dynamic_data_sources {
            Some(data_sources) => {
                if !self.data_nodes.is_empty() {
                    return Err(ConfigurationError::Invalid(format!(
                        "dynamic table {} cannot declare actual data nodes",
                        self.logic_table
                    )));
                }
                (true, dedup(data_sources.into_iter()))
            }
            None => {
                let mut seen = HashSet::new();
                for node in &self.data_nodes {
                    if !seen.insert(node) {
                        return Err(ConfigurationError::DuplicateDataNode {
                            logic_table: self.logic_table.clone(),
                            node: node.to_string(),
                        });
                    }
                }
                (false, dedup(self.data_nodes.iter().map(|n| n.data_source.clone())))
            }
        };

        if data_sources.is_empty() {
            return Err(ConfigurationError::Invalid(format!(
                "table {} has no actual data sources",
                self.logic_table
            )));
        }

        Ok(TableRule {
            logic_table: self.logic_table,
            dynamic,
            data_sources,
            data_nodes: self.data_nodes,
            database_strategy: self.database_strategy,
            table_strategy: self.table_strategy,
        })
    }
}

fn dedup(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for name in names {
        if !result.contains(&name) {
            result.push(name);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn orders() -> TableRule {
        TableRule::builder("orders")
            .actual_tables(&["ds0", "ds1"], &["orders_0", "orders_1"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_inventory_order() {
        let rule = orders();
        assert_eq!(rule.actual_data_source_names(), names(&["ds0", "ds1"]).as_slice());
        assert_eq!(
            rule.data_nodes().iter().map(ToString::to_string).collect::<Vec<_>>(),
            names(&["ds0.orders_0", "ds0.orders_1", "ds1.orders_0", "ds1.orders_1"])
        );
    }

    #[test]
    fn test_actual_table_names_restricted_to_data_sources() {
        let rule = TableRule::builder("orders")
            .actual_data_nodes(vec![
                DataNode::new("ds0", "orders_0"),
                DataNode::new("ds1", "orders_1"),
                DataNode::new("ds1", "orders_2"),
            ])
            .build()
            .unwrap();

        assert_eq!(rule.actual_table_names(&names(&["ds1"])), names(&["orders_1", "orders_2"]));
        assert!(rule.actual_table_names(&names(&["ds9"])).is_empty());
    }

    #[test]
    fn test_actual_data_nodes_drop_unrealizable_pairs() {
        let rule = TableRule::builder("orders")
            .actual_data_nodes(vec![DataNode::new("ds0", "orders_0"), DataNode::new("ds1", "orders_1")])
            .build()
            .unwrap();

        let nodes = rule.actual_data_nodes(&names(&["ds0", "ds1"]), &names(&["orders_0", "orders_1"]));
        assert_eq!(nodes, vec![DataNode::new("ds0", "orders_0"), DataNode::new("ds1", "orders_1")]);
    }

    #[test]
    fn test_dynamic_pairs_every_routed_data_source() {
        let rule = TableRule::builder("t_log").dynamic(&["ds0", "ds1"]).build().unwrap();
        assert!(rule.is_dynamic());

        let nodes = rule.actual_data_nodes(&names(&["ds1"]), &names(&["t_log_a", "t_log_b"]));
        assert_eq!(nodes, vec![DataNode::new("ds1", "t_log_a"), DataNode::new("ds1", "t_log_b")]);
    }

    #[test]
    fn test_duplicate_data_node_rejected() {
        let result = TableRule::builder("orders")
            .actual_tables(&["ds0", "ds0"], &["orders_0"])
            .build();
        assert!(matches!(result, Err(ConfigurationError::DuplicateDataNode { .. })));
    }

    #[test]
    fn test_empty_inventory_rejected() {
        assert!(TableRule::builder("orders").build().is_err());
        assert!(TableRule::builder("t_log").dynamic::<&str>(&[]).build().is_err());
    }

    #[test]
    fn test_dynamic_with_nodes_rejected() {
        let result = TableRule::builder("t_log")
            .dynamic(&["ds0"])
            .actual_tables(&["ds0"], &["t_log_a"])
            .build();
        assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
    }
}
