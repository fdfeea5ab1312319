//! Parsed statement handed over by the SQL parser

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Conditions};
use crate::types::SqlType;

/// What the router needs from a parsed SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub sql_type: SqlType,
    /// Logical tables referenced, in order of appearance
    pub tables: Vec<String>,
    pub conditions: Conditions,
}

impl SqlStatement {
    pub fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            tables: Vec::new(),
            conditions: Conditions::new(),
        }
    }

    /// Add a referenced logical table (duplicates ignored)
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        if !self.tables.iter().any(|t| t.eq_ignore_ascii_case(&table)) {
            self.tables.push(table);
        }
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.add(condition);
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    #[test]
    fn test_builder() {
        let statement = SqlStatement::new(SqlType::Select)
            .with_table("orders")
            .with_table("ORDERS")
            .with_table("order_items")
            .with_condition(Condition::equal(Column::new("user_id", "orders"), 5));

        assert_eq!(statement.tables, vec!["orders", "order_items"]);
        assert_eq!(statement.conditions.len(), 1);
    }
}
