//! Error types for value resolution

use thiserror::Error;

/// Errors raised while turning a condition into a sharding value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Placeholder refers to a parameter that was not bound
    #[error("Parameter index {index} out of range, {bound} parameters bound")]
    ParameterOutOfRange { index: usize, bound: usize },

    /// `IN ()` with nothing inside
    #[error("Empty IN list for column {0}")]
    EmptyInList(String),

    /// BETWEEN needs exactly a lower and an upper bound
    #[error("BETWEEN on column {column} expects 2 values, got {got}")]
    InvalidRange { column: String, got: usize },

    /// Equality needs exactly one value
    #[error("Equality on column {column} expects 1 value, got {got}")]
    InvalidEquality { column: String, got: usize },
}
