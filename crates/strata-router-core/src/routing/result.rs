//! Routing result

use serde::{Deserialize, Serialize};
use std::fmt;

/// One physical statement target: the unit of execution fan-out
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableUnit {
    pub data_source: String,
    pub logic_table: String,
    pub actual_table: String,
}

impl TableUnit {
    pub fn new(
        data_source: impl Into<String>,
        logic_table: impl Into<String>,
        actual_table: impl Into<String>,
    ) -> Self {
        Self {
            data_source: data_source.into(),
            logic_table: logic_table.into(),
            actual_table: actual_table.into(),
        }
    }
}

impl fmt::Display for TableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.data_source, self.actual_table, self.logic_table)
    }
}

/// Every table unit a statement fans out to, in inventory scan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResult {
    table_units: Vec<TableUnit>,
}

impl RoutingResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: TableUnit) {
        self.table_units.push(unit);
    }

    pub fn extend(&mut self, other: RoutingResult) {
        self.table_units.extend(other.table_units);
    }

    pub fn table_units(&self) -> &[TableUnit] {
        &self.table_units
    }

    pub fn into_table_units(self) -> Vec<TableUnit> {
        self.table_units
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableUnit> {
        self.table_units.iter()
    }

    pub fn len(&self) -> usize {
        self.table_units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_units.is_empty()
    }

    /// Exactly one physical target
    pub fn is_single_routing(&self) -> bool {
        self.table_units.len() == 1
    }

    /// Distinct data sources reached, in first-seen order
    pub fn data_source_names(&self) -> Vec<&str> {
        let mut result: Vec<&str> = Vec::new();
        for unit in &self.table_units {
            if !result.contains(&unit.data_source.as_str()) {
                result.push(&unit.data_source);
            }
        }
        result
    }

    /// Units targeting one data source
    pub fn table_units_for<'a>(&'a self, data_source: &'a str) -> impl Iterator<Item = &'a TableUnit> + 'a {
        self.table_units.iter().filter(move |u| u.data_source == data_source)
    }
}

impl IntoIterator for RoutingResult {
    type Item = TableUnit;
    type IntoIter = std::vec::IntoIter<TableUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.table_units.into_iter()
    }
}

impl fmt::Display for RoutingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units: Vec<String> = self.table_units.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", units.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> RoutingResult {
        let mut result = RoutingResult::new();
        result.push(TableUnit::new("ds0", "orders", "orders_0"));
        result.push(TableUnit::new("ds0", "orders", "orders_1"));
        result.push(TableUnit::new("ds1", "orders", "orders_0"));
        result
    }

    #[test]
    fn test_data_source_names() {
        assert_eq!(result().data_source_names(), vec!["ds0", "ds1"]);
    }

    #[test]
    fn test_table_units_for() {
        let result = result();
        let tables: Vec<_> = result.table_units_for("ds0").map(|u| u.actual_table.as_str()).collect();
        assert_eq!(tables, vec!["orders_0", "orders_1"]);
    }

    #[test]
    fn test_single_routing() {
        let mut single = RoutingResult::new();
        assert!(!single.is_single_routing());
        single.push(TableUnit::new("ds1", "orders", "orders_1"));
        assert!(single.is_single_routing());
        assert!(!result().is_single_routing());
    }

    #[test]
    fn test_display() {
        let mut single = RoutingResult::new();
        single.push(TableUnit::new("ds1", "orders", "orders_1"));
        assert_eq!(single.to_string(), "[ds1.orders_1 (orders)]");
    }
}
