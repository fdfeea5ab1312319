//! Simple routing engine: routes one logical table
//!
//! ```text
//! TableRule ──► database strategy ──► routed data sources
//!                                          │
//!                                          ▼
//!               table strategy ───► routed tables (within those data sources)
//!                                          │
//!                                          ▼
//!               inventory scan ───► one TableUnit per real data node
//! ```

use strata_core::{Column, ShardingValue, SqlStatement, Value};
use tracing::{debug, trace};

use super::{RoutingEngine, RoutingResult, TableUnit};
use crate::error::{RouterError, RoutingPhase};
use crate::hint::HintContext;
use crate::rule::{ShardingRule, TableRule};

/// Routes a statement against a single logical table
#[derive(Debug, Clone, Copy)]
pub struct SimpleRoutingEngine<'a> {
    sharding_rule: &'a ShardingRule,
    parameters: &'a [Value],
    logic_table: &'a str,
    statement: &'a SqlStatement,
    hint: Option<&'a HintContext>,
}

impl<'a> SimpleRoutingEngine<'a> {
    pub fn new(
        sharding_rule: &'a ShardingRule,
        parameters: &'a [Value],
        logic_table: &'a str,
        statement: &'a SqlStatement,
    ) -> Self {
        Self {
            sharding_rule,
            parameters,
            logic_table,
            statement,
            hint: None,
        }
    }

    /// Hint for this query; only consulted when hint routing is active
    pub fn with_hint(mut self, hint: Option<&'a HintContext>) -> Self {
        self.hint = hint;
        self
    }

    fn active_hint(&self) -> Option<&'a HintContext> {
        self.hint.filter(|h| h.is_hint_routing_active())
    }

    fn route_data_sources(&self, table_rule: &TableRule) -> Result<Vec<String>, RouterError> {
        let strategy = self.sharding_rule.database_strategy(table_rule);
        let values = self.sharding_values(strategy.sharding_columns(), RoutingPhase::Database)?;

        let result = strategy.static_sharding(
            self.statement.sql_type,
            table_rule.actual_data_source_names(),
            &values,
        )?;
        trace!(
            logic_table = %self.logic_table,
            strategy = strategy.name(),
            values = values.len(),
            routed = ?result,
            "Routed data sources"
        );

        if result.is_empty() {
            return Err(self.no_route(RoutingPhase::Database));
        }
        Ok(result)
    }

    fn route_tables(&self, table_rule: &TableRule, routed_data_sources: &[String]) -> Result<Vec<String>, RouterError> {
        let strategy = self.sharding_rule.table_strategy(table_rule);
        let values = self.sharding_values(strategy.sharding_columns(), RoutingPhase::Table)?;

        let result = if table_rule.is_dynamic() {
            strategy.dynamic_sharding(&values)?
        } else {
            let candidates = table_rule.actual_table_names(routed_data_sources);
            strategy.static_sharding(self.statement.sql_type, &candidates, &values)?
        };
        trace!(
            logic_table = %self.logic_table,
            strategy = strategy.name(),
            dynamic = table_rule.is_dynamic(),
            values = values.len(),
            routed = ?result,
            "Routed tables"
        );

        if result.is_empty() {
            return Err(self.no_route(RoutingPhase::Table));
        }
        Ok(result)
    }

    /// Values for `columns` in declaration order, from the hint or from SQL, never both
    fn sharding_values(&self, columns: &[String], phase: RoutingPhase) -> Result<Vec<ShardingValue>, RouterError> {
        if let Some(hint) = self.active_hint() {
            return Ok(columns
                .iter()
                .filter_map(|column| match phase {
                    RoutingPhase::Database => hint.database_sharding_value(self.logic_table, column),
                    RoutingPhase::Table => hint.table_sharding_value(self.logic_table, column),
                })
                .cloned()
                .collect());
        }

        let mut values = Vec::with_capacity(columns.len());
        for column in columns {
            if let Some(condition) = self.statement.conditions.find(&Column::new(column.as_str(), self.logic_table)) {
                values.push(condition.sharding_value(self.parameters)?);
            }
        }
        Ok(values)
    }

    fn generate_routing_result(
        &self,
        table_rule: &TableRule,
        routed_data_sources: &[String],
        routed_tables: &[String],
    ) -> RoutingResult {
        let mut result = RoutingResult::new();
        for node in table_rule.actual_data_nodes(routed_data_sources, routed_tables) {
            result.push(TableUnit::new(node.data_source, self.logic_table, node.table));
        }
        result
    }

    fn no_route(&self, phase: RoutingPhase) -> RouterError {
        RouterError::Routing {
            phase,
            logic_table: self.logic_table.to_string(),
        }
    }
}

impl RoutingEngine for SimpleRoutingEngine<'_> {
    fn route(&self) -> Result<RoutingResult, RouterError> {
        let table_rule = self.sharding_rule.table_rule(self.logic_table)?;
        let routed_data_sources = self.route_data_sources(table_rule)?;
        let routed_tables = self.route_tables(table_rule, &routed_data_sources)?;
        let result = self.generate_routing_result(table_rule, &routed_data_sources, &routed_tables);

        // Both phases routed somewhere, yet no real node joins them
        if result.is_empty() {
            return Err(self.no_route(RoutingPhase::Table));
        }

        debug!(
            logic_table = %self.logic_table,
            sql_type = %self.statement.sql_type,
            hint = self.active_hint().is_some(),
            units = result.len(),
            "Routing completed"
        );
        Ok(result)
    }
}
