//! Strata Core - Statement model shared by the parser and the router
//!
//! This crate provides the request-scoped types a parsed SQL statement
//! carries into routing: sharding values, the condition model, and the
//! statement boundary, plus the engine configuration.

pub mod condition;
pub mod config;
pub mod error;
pub mod statement;
pub mod types;
pub mod value;

pub use condition::{Condition, ConditionValue, Conditions};
pub use config::EngineConfig;
pub use error::ValueError;
pub use statement::SqlStatement;
pub use types::{Column, DataSourceName, LogicTableName, ShardingKey, SqlType};
pub use value::{ShardingOperator, ShardingValue, ShardingValueKind, Value};
