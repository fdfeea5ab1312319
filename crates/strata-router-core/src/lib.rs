//! Strata Router - Sharding Routing Module
//!
//! Routes a parsed SQL statement to the physical tables it must run against.
//!
//! # Architecture
//!
//! ```text
//! SqlStatement + parameters (+ hint)
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │     ShardingRouter      │  Loads the current rule snapshot
//! │   (Which rule?)         │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │  SimpleRoutingEngine    │  Database strategy, then table strategy
//! │   (Which data nodes?)   │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//!       RoutingResult (TableUnit per data node)
//! ```
//!
//! # Sharding Strategies
//!
//! ## Static (strategy module)
//! - **NoneShardingStrategy**: No sharding column, every candidate
//! - **StandardShardingStrategy**: One column, pluggable algorithm
//!   (`Modulo`, `HashMod`, `ConsistentHash`, `Range`)
//!
//! ## Dynamic (strategy module)
//! - **BucketDynamicStrategy**: Table name from a numeric bucket
//! - **TemplateDynamicStrategy**: Table name from a template
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_router_core::{RoutingContext, ShardingRouter};
//!
//! let router = ShardingRouter::from_config(EngineConfig::from_env())?;
//!
//! let ctx = RoutingContext::new(statement).with_parameters(vec![Value::Int(7)]);
//! let result = router.route(&ctx, "orders")?;
//! ```

// Core modules
mod error;
pub mod hint;
mod rule;
mod snapshot;

// Strategy module (contains all sharding strategies)
mod strategy;

// Routing
mod router;
mod routing;


// Re-exports: Error types
pub use error::{ConfigurationError, RouterError, RoutingPhase, StrategyError};

// Re-exports: Hint
pub use hint::HintContext;

// Re-exports: Rule model
pub use rule::{
    DataNode, ShardingRule, ShardingRuleBuilder, ShardingRuleConfig, StrategyConfig, TableRule,
    TableRuleBuilder, TableRuleConfig,
};
pub use snapshot::RuleSnapshot;

// Re-exports: Strategy traits and implementations
pub use strategy::{
    // Traits
    ShardingStrategy, SingleKeyShardingAlgorithm,
    // Static strategies
    NoneShardingStrategy, StandardShardingStrategy,
    // Single-key algorithms
    ConsistentHashShardingAlgorithm, HashModShardingAlgorithm, ModuloShardingAlgorithm,
    RangeShardingAlgorithm, RangeTarget,
    // Dynamic strategies
    BucketDynamicStrategy, TemplateDynamicStrategy, DEFAULT_MAX_RANGE_BUCKETS, TEMPLATE_PLACEHOLDER,
};

// Re-exports: Routing
pub use router::{RoutingContext, ShardingRouter};
pub use routing::{route, RoutingEngine, RoutingResult, SimpleRoutingEngine, TableUnit};
