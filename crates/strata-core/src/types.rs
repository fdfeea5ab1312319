//! Common types shared by the statement model and the router
//!
//! Centralizes identifiers to avoid duplication across modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Logical table name as written in application SQL
pub type LogicTableName = String;

/// Name of a physical data source
pub type DataSourceName = String;

/// Type of a parsed SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Select => write!(f, "SELECT"),
            SqlType::Insert => write!(f, "INSERT"),
            SqlType::Update => write!(f, "UPDATE"),
            SqlType::Delete => write!(f, "DELETE"),
            SqlType::Other => write!(f, "OTHER"),
        }
    }
}

/// Column of a logical table, the target of a sharding predicate
///
/// Equality and hashing ignore ASCII case, as SQL identifiers do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub table_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
        }
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.table_name.eq_ignore_ascii_case(&other.table_name)
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.table_name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table_name, self.name)
    }
}

/// Key of a hint value: (logical table, sharding column)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardingKey {
    pub logic_table: String,
    pub sharding_column: String,
}

impl ShardingKey {
    pub fn new(logic_table: impl Into<String>, sharding_column: impl Into<String>) -> Self {
        Self {
            logic_table: logic_table.into(),
            sharding_column: sharding_column.into(),
        }
    }
}

impl PartialEq for ShardingKey {
    fn eq(&self, other: &Self) -> bool {
        self.logic_table.eq_ignore_ascii_case(&other.logic_table)
            && self.sharding_column.eq_ignore_ascii_case(&other.sharding_column)
    }
}

impl Eq for ShardingKey {}

impl Hash for ShardingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.logic_table.to_ascii_lowercase().hash(state);
        self.sharding_column.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for ShardingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.logic_table, self.sharding_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_ignores_case() {
        assert_eq!(Column::new("USER_ID", "Orders"), Column::new("user_id", "orders"));
        let set: HashSet<_> = [Column::new("a", "T"), Column::new("A", "t")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sharding_key_ignores_case() {
        assert_eq!(ShardingKey::new("ORDERS", "user_id"), ShardingKey::new("orders", "USER_ID"));
    }

    #[test]
    fn test_sql_type_display() {
        assert_eq!(SqlType::Insert.to_string(), "INSERT");
    }
}
