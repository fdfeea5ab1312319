//! Error types for the router module

use std::fmt;

use strata_core::{ShardingOperator, ValueError};
use thiserror::Error;

/// Routing phase that produced no target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingPhase {
    Database,
    Table,
}

impl fmt::Display for RoutingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingPhase::Database => write!(f, "database"),
            RoutingPhase::Table => write!(f, "table"),
        }
    }
}

/// Sharding rule is missing or malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Logical table not present in the sharding rule
    #[error("Cannot find table rule for logic table: {0}")]
    UnknownTable(String),

    /// Two table rules share a logical name
    #[error("Duplicate table rule for logic table: {0}")]
    DuplicateTable(String),

    /// Same physical node listed twice in one table rule
    #[error("Duplicate data node {node} in table rule {logic_table}")]
    DuplicateDataNode { logic_table: String, node: String },

    /// Data node text is not `data_source.table`
    #[error("Invalid data node: {0}")]
    InvalidDataNode(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Rule document is not valid JSON for the expected shape
    #[error("Malformed rule document: {0}")]
    Parse(String),

    /// Rule file could not be read
    #[error("Failed to read rule file {path}: {message}")]
    Io { path: String, message: String },
}

/// Errors raised inside a sharding strategy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// Algorithm needs an integer sharding value
    #[error("Sharding value {value} on column {column} is not an integer")]
    NotAnInteger { column: String, value: String },

    /// Algorithm cannot evaluate this operator
    #[error("Operator {operator} is not supported by {strategy}")]
    UnsupportedOperator {
        strategy: &'static str,
        operator: ShardingOperator,
    },

    /// Dynamic strategy has nothing to compute table names from
    #[error("Dynamic sharding of {strategy} requires a sharding value")]
    MissingShardingValue { strategy: &'static str },

    /// Static-only strategy asked to generate names
    #[error("Strategy {0} does not support dynamic sharding")]
    DynamicUnsupported(&'static str),

    /// An INSERT must land on exactly one node
    #[error("INSERT statement should contain sharding value")]
    InsertWithoutShardingValue,

    /// Range expands to more names than the strategy allows
    #[error("Range {lower}..={upper} expands to more than {limit} shards")]
    RangeTooWide { lower: i64, upper: i64, limit: u64 },

    /// Configured modulus or bucket size of zero
    #[error("Invalid strategy parameter: {0}")]
    InvalidParameter(String),
}

/// Router error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Rule lookup or rule construction failed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A routing phase selected no target
    #[error("no {phase} route info for logic table {logic_table}")]
    Routing {
        phase: RoutingPhase,
        logic_table: String,
    },

    /// Propagated unchanged from a strategy
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// A condition could not be resolved against the parameters
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Statement names no table to route
    #[error("Statement references no logical table")]
    NoLogicTable,
}

impl RouterError {
    /// Phase that came up empty, for routing errors
    pub fn phase(&self) -> Option<RoutingPhase> {
        match self {
            RouterError::Routing { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_error_message_names_phase() {
        let err = RouterError::Routing {
            phase: RoutingPhase::Database,
            logic_table: "orders".to_string(),
        };
        assert_eq!(err.to_string(), "no database route info for logic table orders");
        assert_eq!(err.phase(), Some(RoutingPhase::Database));
    }

    #[test]
    fn test_configuration_error_is_transparent() {
        let err: RouterError = ConfigurationError::UnknownTable("nonexistent".to_string()).into();
        assert_eq!(err.to_string(), "Cannot find table rule for logic table: nonexistent");
        assert_eq!(err.phase(), None);
    }
}
