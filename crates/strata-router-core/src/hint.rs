//! Hint context
//!
//! Lets a caller force sharding values for a query instead of deriving them
//! from SQL predicates. Hint routing is all-or-nothing: while it is active
//! the router reads every sharding value from the hint and ignores the
//! statement's conditions entirely, even for columns the hint leaves unset.
//!
//! A `HintContext` is a plain value owned by one query. It can be passed to
//! the router explicitly, or bound to the current task with [`scope`] /
//! [`sync_scope`] so code further down the call chain can pick it up with
//! [`current`]. The binding is released when the scope exits, on every path.
//!
//! ```rust,ignore
//! let mut hint = HintContext::new();
//! hint.add_database_sharding_value(ShardingValue::single("orders", "user_id", 5));
//!
//! hint::scope(hint, async {
//!     router.route_in_scope(&ctx, "orders")
//! }).await;
//! ```

use std::collections::HashMap;
use std::future::Future;

use strata_core::{ShardingKey, ShardingValue};

tokio::task_local! {
    static CURRENT_HINT: HintContext;
}

/// Sharding values supplied out of band for one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintContext {
    hint_routing: bool,
    database_values: HashMap<ShardingKey, ShardingValue>,
    table_values: HashMap<ShardingKey, ShardingValue>,
}

impl HintContext {
    /// Empty, inactive hint
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the database sharding value of one column; activates hint routing
    pub fn add_database_sharding_value(&mut self, value: ShardingValue) -> &mut Self {
        let key = ShardingKey::new(value.logic_table.clone(), value.column.clone());
        self.database_values.insert(key, value);
        self.hint_routing = true;
        self
    }

    /// Force the table sharding value of one column; activates hint routing
    pub fn add_table_sharding_value(&mut self, value: ShardingValue) -> &mut Self {
        let key = ShardingKey::new(value.logic_table.clone(), value.column.clone());
        self.table_values.insert(key, value);
        self.hint_routing = true;
        self
    }

    /// Switch hint routing on or off without touching the stored values
    ///
    /// Active with no values routes as if nothing constrained the query.
    pub fn set_hint_routing(&mut self, active: bool) -> &mut Self {
        self.hint_routing = active;
        self
    }

    pub fn is_hint_routing_active(&self) -> bool {
        self.hint_routing
    }

    pub fn database_sharding_value(&self, logic_table: &str, column: &str) -> Option<&ShardingValue> {
        self.database_values.get(&ShardingKey::new(logic_table, column))
    }

    pub fn table_sharding_value(&self, logic_table: &str, column: &str) -> Option<&ShardingValue> {
        self.table_values.get(&ShardingKey::new(logic_table, column))
    }

    /// Drop every value and deactivate
    pub fn clear(&mut self) {
        self.hint_routing = false;
        self.database_values.clear();
        self.table_values.clear();
    }
}

/// Run `f` with `hint` bound to the current task
pub async fn scope<F: Future>(hint: HintContext, f: F) -> F::Output {
    CURRENT_HINT.scope(hint, f).await
}

/// Run `f` with `hint` bound to the current task, synchronously
pub fn sync_scope<R>(hint: HintContext, f: impl FnOnce() -> R) -> R {
    CURRENT_HINT.sync_scope(hint, f)
}

/// Hint bound to the current task, if any
pub fn current() -> Option<HintContext> {
    CURRENT_HINT.try_with(|hint| hint.clone()).ok()
}
