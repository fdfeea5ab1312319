//! Condition model
//!
//! The SQL parser collects, per statement, the predicates that constrain a
//! sharding column. Only predicates that can affect routing are added, so the
//! router looks conditions up by column and never filters them itself.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::Column;
use crate::value::{ShardingOperator, ShardingValue, ShardingValueKind, Value};

/// Right-hand side of a predicate: a literal or a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionValue {
    Literal(Value),
    /// Zero-based index into the bound parameter list
    Parameter(usize),
}

impl ConditionValue {
    fn resolve(&self, parameters: &[Value]) -> Result<Value, ValueError> {
        match self {
            ConditionValue::Literal(v) => Ok(v.clone()),
            ConditionValue::Parameter(index) => parameters
                .get(*index)
                .cloned()
                .ok_or(ValueError::ParameterOutOfRange {
                    index: *index,
                    bound: parameters.len(),
                }),
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(v: Value) -> Self {
        ConditionValue::Literal(v)
    }
}

impl From<i64> for ConditionValue {
    fn from(v: i64) -> Self {
        ConditionValue::Literal(Value::Int(v))
    }
}

impl From<i32> for ConditionValue {
    fn from(v: i32) -> Self {
        ConditionValue::Literal(Value::Int(v as i64))
    }
}

impl From<&str> for ConditionValue {
    fn from(v: &str) -> Self {
        ConditionValue::Literal(Value::Text(v.to_string()))
    }
}

/// A predicate on one sharding column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub column: Column,
    pub operator: ShardingOperator,
    pub values: Vec<ConditionValue>,
}

impl Condition {
    pub fn new(column: Column, operator: ShardingOperator, values: Vec<ConditionValue>) -> Self {
        Self { column, operator, values }
    }

    /// `column = value`
    pub fn equal(column: Column, value: impl Into<ConditionValue>) -> Self {
        Self::new(column, ShardingOperator::Equal, vec![value.into()])
    }

    /// `column IN (values...)`
    pub fn in_list<V: Into<ConditionValue>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(column, ShardingOperator::In, values.into_iter().map(Into::into).collect())
    }

    /// `column BETWEEN lower AND upper`
    pub fn between(column: Column, lower: impl Into<ConditionValue>, upper: impl Into<ConditionValue>) -> Self {
        Self::new(column, ShardingOperator::Between, vec![lower.into(), upper.into()])
    }

    /// Resolve placeholders against the bound parameters
    pub fn sharding_value(&self, parameters: &[Value]) -> Result<ShardingValue, ValueError> {
        let resolved = self
            .values
            .iter()
            .map(|v| v.resolve(parameters))
            .collect::<Result<Vec<_>, _>>()?;

        let kind = match self.operator {
            ShardingOperator::Equal => match <[Value; 1]>::try_from(resolved) {
                Ok([value]) => ShardingValueKind::Single(value),
                Err(resolved) => {
                    return Err(ValueError::InvalidEquality {
                        column: self.column.to_string(),
                        got: resolved.len(),
                    })
                }
            },
            ShardingOperator::In => {
                if resolved.is_empty() {
                    return Err(ValueError::EmptyInList(self.column.to_string()));
                }
                ShardingValueKind::List(resolved)
            }
            ShardingOperator::Between => match <[Value; 2]>::try_from(resolved) {
                Ok([lower, upper]) => ShardingValueKind::Range { lower, upper },
                Err(resolved) => {
                    return Err(ValueError::InvalidRange {
                        column: self.column.to_string(),
                        got: resolved.len(),
                    })
                }
            },
        };

        Ok(ShardingValue {
            logic_table: self.column.table_name.clone(),
            column: self.column.name.clone(),
            kind,
        })
    }
}

/// Ordered collection of conditions for one statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    conditions: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; a later condition on the same column replaces the earlier one
    pub fn add(&mut self, condition: Condition) {
        match self.conditions.iter_mut().find(|c| c.column == condition.column) {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn find(&self, column: &Column) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.column == *column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
