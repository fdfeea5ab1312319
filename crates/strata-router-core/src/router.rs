//! Sharding Router
//!
//! Entry point for the query-execution layer. Holds the published rule
//! snapshot and routes each query against the snapshot current at its start.
//!
//! # Hint resolution
//!
//! ```text
//! RoutingContext.hint set? ──Yes──► use it
//!        │
//!        No
//!        ▼
//! *_in_scope? ──Yes──► hint bound to the current task, if any
//!        │
//!        No
//!        ▼
//! route from SQL conditions
//! ```

use std::sync::Arc;

use strata_core::{EngineConfig, SqlStatement, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ConfigurationError, RouterError};
use crate::hint::{self, HintContext};
use crate::routing::{self, RoutingResult};
use crate::rule::{ShardingRule, ShardingRuleConfig};
use crate::snapshot::RuleSnapshot;

/// Everything routing needs to know about one query
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// Correlates log lines of one query
    pub query_id: Uuid,

    pub statement: SqlStatement,

    /// Bound parameters, by placeholder index
    pub parameters: Vec<Value>,

    /// Explicit hint for this query
    pub hint: Option<HintContext>,
}

impl RoutingContext {
    pub fn new(statement: SqlStatement) -> Self {
        Self {
            query_id: Uuid::new_v4(),
            statement,
            parameters: Vec::new(),
            hint: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_hint(mut self, hint: HintContext) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Routes queries against the currently published sharding rule
pub struct ShardingRouter {
    snapshot: Arc<RuleSnapshot>,
    config: EngineConfig,
}

impl ShardingRouter {
    pub fn new(snapshot: Arc<RuleSnapshot>, config: EngineConfig) -> Self {
        Self { snapshot, config }
    }

    /// Load the rule file named by the engine config
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigurationError> {
        let path = config
            .rule_file
            .clone()
            .ok_or_else(|| ConfigurationError::Invalid("no rule file configured".to_string()))?;
        let rule_config = ShardingRuleConfig::from_path(&path)?;
        let snapshot = RuleSnapshot::from_config(&rule_config)?;
        debug!(rule_file = %path.display(), "Sharding router created");
        Ok(Self::new(Arc::new(snapshot), config))
    }

    pub fn snapshot(&self) -> &Arc<RuleSnapshot> {
        &self.snapshot
    }

    /// Route one logical table using the context's explicit hint, if any
    pub fn route(&self, ctx: &RoutingContext, logic_table: &str) -> Result<RoutingResult, RouterError> {
        let rule = self.snapshot.load();
        self.route_with(&rule, ctx, logic_table, ctx.hint.as_ref())
    }

    /// Route one logical table, falling back to the hint bound to the current task
    pub fn route_in_scope(&self, ctx: &RoutingContext, logic_table: &str) -> Result<RoutingResult, RouterError> {
        let scoped = Self::scoped_hint(ctx);
        let rule = self.snapshot.load();
        self.route_with(&rule, ctx, logic_table, ctx.hint.as_ref().or(scoped.as_ref()))
    }

    /// Route every logical table the statement references, one after another
    ///
    /// All tables are routed against the same snapshot; the first failure
    /// aborts the whole statement. Like [`route`](Self::route), only the
    /// context's explicit hint is consulted; see
    /// [`route_statement_in_scope`](Self::route_statement_in_scope).
    pub fn route_statement(&self, ctx: &RoutingContext) -> Result<RoutingResult, RouterError> {
        self.route_tables(ctx, ctx.hint.as_ref())
    }

    /// Route every referenced table, falling back to the hint bound to the current task
    pub fn route_statement_in_scope(&self, ctx: &RoutingContext) -> Result<RoutingResult, RouterError> {
        let scoped = Self::scoped_hint(ctx);
        self.route_tables(ctx, ctx.hint.as_ref().or(scoped.as_ref()))
    }

    /// Task-bound hint, looked up only when the context carries none
    fn scoped_hint(ctx: &RoutingContext) -> Option<HintContext> {
        match ctx.hint {
            Some(_) => None,
            None => hint::current(),
        }
    }

    fn route_tables(&self, ctx: &RoutingContext, hint: Option<&HintContext>) -> Result<RoutingResult, RouterError> {
        if ctx.statement.tables.is_empty() {
            return Err(RouterError::NoLogicTable);
        }
        let rule = self.snapshot.load();
        let mut result = RoutingResult::new();
        for table in &ctx.statement.tables {
            result.extend(self.route_with(&rule, ctx, table, hint)?);
        }
        Ok(result)
    }

    fn route_with(
        &self,
        rule: &ShardingRule,
        ctx: &RoutingContext,
        logic_table: &str,
        hint: Option<&HintContext>,
    ) -> Result<RoutingResult, RouterError> {
        let result = routing::route(rule, &ctx.parameters, logic_table, &ctx.statement, hint).map_err(|e| {
            debug!(query_id = %ctx.query_id, logic_table = %logic_table, error = %e, "Routing failed");
            e
        })?;

        if self.config.sql_show {
            info!(
                query_id = %ctx.query_id,
                sql_type = %ctx.statement.sql_type,
                logic_table = %logic_table,
                units = %result,
                "Route result"
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use strata_core::{Column, Condition, ShardingValue, SqlType};

    const RULE: &str = r#"{
        "tables": [
            {
                "logic_table": "orders",
                "data_sources": ["ds0", "ds1"],
                "actual_tables": ["orders_0", "orders_1"],
                "database_strategy": { "type": "modulo", "column": "user_id", "shard_count": 2 },
                "table_strategy": { "type": "modulo", "column": "user_id", "shard_count": 2 }
            },
            {
                "logic_table": "users",
                "actual_data_nodes": ["ds0.users"]
            }
        ]
    }"#;

    fn router() -> ShardingRouter {
        let config = ShardingRuleConfig::from_json(RULE).unwrap();
        let snapshot = RuleSnapshot::from_config(&config).unwrap();
        ShardingRouter::new(Arc::new(snapshot), EngineConfig::default())
    }

    fn orders_by_user(user_id: i64) -> RoutingContext {
        let statement = SqlStatement::new(SqlType::Select)
            .with_table("orders")
            .with_condition(Condition::equal(Column::new("user_id", "orders"), user_id));
        RoutingContext::new(statement)
    }

    #[test]
    fn test_route_statement_covers_every_table() {
        let router = router();
        let statement = SqlStatement::new(SqlType::Select)
            .with_table("orders")
            .with_table("users")
            .with_condition(Condition::equal(Column::new("user_id", "orders"), 3));

        let result = router.route_statement(&RoutingContext::new(statement)).unwrap();
        let units: Vec<String> = result.iter().map(ToString::to_string).collect();
        assert_eq!(units, vec!["ds1.orders_1 (orders)", "ds0.users (users)"]);
    }

    #[test]
    fn test_route_statement_without_tables() {
        let ctx = RoutingContext::new(SqlStatement::new(SqlType::Select));
        assert_eq!(router().route_statement(&ctx), Err(RouterError::NoLogicTable));
    }

    #[test]
    fn test_explicit_hint_wins_over_scope() {
        let router = router();
        let mut explicit = HintContext::new();
        explicit.add_database_sharding_value(ShardingValue::single("orders", "user_id", 0));
        let mut scoped = HintContext::new();
        scoped.add_database_sharding_value(ShardingValue::single("orders", "user_id", 1));

        let ctx = orders_by_user(1).with_hint(explicit);
        let result = hint::sync_scope(scoped, || router.route_in_scope(&ctx, "orders")).unwrap();

        assert_eq!(result.data_source_names(), vec!["ds0"]);
    }

    #[test]
    fn test_scoped_hint_applies() {
        let router = router();
        let mut scoped = HintContext::new();
        scoped.add_database_sharding_value(ShardingValue::single("orders", "user_id", 0));
        scoped.add_table_sharding_value(ShardingValue::single("orders", "user_id", 0));

        let ctx = orders_by_user(1);
        let in_scope = hint::sync_scope(scoped, || router.route_in_scope(&ctx, "orders")).unwrap();
        let outside = router.route_in_scope(&ctx, "orders").unwrap();

        assert_eq!(in_scope.table_units()[0].actual_table, "orders_0");
        assert_eq!(outside.table_units()[0].actual_table, "orders_1");
    }

    #[test]
    fn test_route_ignores_scope() {
        let router = router();
        let mut scoped = HintContext::new();
        scoped.add_database_sharding_value(ShardingValue::single("orders", "user_id", 0));

        let ctx = orders_by_user(1);
        let result = hint::sync_scope(scoped, || router.route(&ctx, "orders")).unwrap();
        assert_eq!(result.data_source_names(), vec!["ds1"]);
    }

    #[test]
    fn test_statement_scope_resolution() {
        let router = router();
        let mut scoped = HintContext::new();
        scoped.add_database_sharding_value(ShardingValue::single("orders", "user_id", 0));
        scoped.add_table_sharding_value(ShardingValue::single("orders", "user_id", 0));
        let ctx = orders_by_user(1);

        let (explicit_only, in_scope) = hint::sync_scope(scoped, || {
            (router.route_statement(&ctx), router.route_statement_in_scope(&ctx))
        });

        assert_eq!(explicit_only.unwrap().table_units()[0].actual_table, "orders_1");
        assert_eq!(in_scope.unwrap().table_units()[0].actual_table, "orders_0");
    }

    #[test]
    fn test_from_config_reads_rule_file() {
        let path = std::env::temp_dir().join(format!("strata-rule-{}.json", Uuid::new_v4()));
        std::fs::File::create(&path).unwrap().write_all(RULE.as_bytes()).unwrap();

        let config = EngineConfig {
            rule_file: Some(path.clone()),
            sql_show: true,
        };
        let router = ShardingRouter::from_config(config).unwrap();
        let result = router.route(&orders_by_user(5), "orders").unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_single_routing());
    }

    #[test]
    fn test_from_config_requires_rule_file() {
        assert!(matches!(
            ShardingRouter::from_config(EngineConfig::default()),
            Err(ConfigurationError::Invalid(_))
        ));
    }
}
