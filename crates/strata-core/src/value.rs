//! Sharding values
//!
//! A sharding value binds one sharding column of one logical table to the
//! value(s) a predicate or hint constrained it to. Strategies consume them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar value of a sharding column or bound parameter
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Integer view, if this value is numeric or a numeric string
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Bytes fed to hash-based algorithms
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Int(v) => v.to_be_bytes().to_vec(),
            Value::Text(s) => s.as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// SQL operator a sharding value was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShardingOperator {
    /// `column = ?`
    Equal,
    /// `column IN (?, ?, ...)`
    In,
    /// `column BETWEEN ? AND ?`
    Between,
}

impl fmt::Display for ShardingOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardingOperator::Equal => write!(f, "="),
            ShardingOperator::In => write!(f, "IN"),
            ShardingOperator::Between => write!(f, "BETWEEN"),
        }
    }
}

/// Shape of a sharding value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardingValueKind {
    Single(Value),
    List(Vec<Value>),
    /// Inclusive on both ends
    Range { lower: Value, upper: Value },
}

/// Value bound to one sharding column of one logical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingValue {
    pub logic_table: String,
    pub column: String,
    pub kind: ShardingValueKind,
}

impl ShardingValue {
    pub fn single(logic_table: impl Into<String>, column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            logic_table: logic_table.into(),
            column: column.into(),
            kind: ShardingValueKind::Single(value.into()),
        }
    }

    pub fn list<V: Into<Value>>(
        logic_table: impl Into<String>,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            logic_table: logic_table.into(),
            column: column.into(),
            kind: ShardingValueKind::List(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn range(
        logic_table: impl Into<String>,
        column: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        Self {
            logic_table: logic_table.into(),
            column: column.into(),
            kind: ShardingValueKind::Range {
                lower: lower.into(),
                upper: upper.into(),
            },
        }
    }

    /// Operator this value was derived from
    pub fn operator(&self) -> ShardingOperator {
        match self.kind {
            ShardingValueKind::Single(_) => ShardingOperator::Equal,
            ShardingValueKind::List(_) => ShardingOperator::In,
            ShardingValueKind::Range { .. } => ShardingOperator::Between,
        }
    }
}

impl fmt::Display for ShardingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ", self.logic_table, self.column)?;
        match &self.kind {
            ShardingValueKind::Single(v) => write!(f, "= {}", v),
            ShardingValueKind::List(values) => {
                let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "IN ({})", joined.join(", "))
            }
            ShardingValueKind::Range { lower, upper } => write!(f, "BETWEEN {} AND {}", lower, upper),
        }
    }
}
