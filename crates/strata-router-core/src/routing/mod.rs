//! Routing
//!
//! Turns a parsed statement into the physical targets it must be sent to.

mod result;
mod simple;

pub use result::{RoutingResult, TableUnit};
pub use simple::SimpleRoutingEngine;

use strata_core::{SqlStatement, Value};

use crate::error::RouterError;
use crate::hint::HintContext;
use crate::rule::ShardingRule;

/// Trait for routing engines
pub trait RoutingEngine {
    /// Compute every table unit the statement fans out to
    fn route(&self) -> Result<RoutingResult, RouterError>;
}

/// Route `statement` against one logical table
///
/// Pure apart from reading the rule: the same arguments always yield the
/// same result, and an empty result is never returned.
pub fn route(
    sharding_rule: &ShardingRule,
    parameters: &[Value],
    logic_table: &str,
    statement: &SqlStatement,
    hint: Option<&HintContext>,
) -> Result<RoutingResult, RouterError> {
    SimpleRoutingEngine::new(sharding_rule, parameters, logic_table, statement)
        .with_hint(hint)
        .route()
}
