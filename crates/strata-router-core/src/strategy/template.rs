//! Template Dynamic Strategy
//!
//! Substitutes the sharding value into a name template, e.g. `t_log_{}` with
//! `tenant = 'acme'` → `t_log_acme`. Suited to per-tenant or per-day tables.

use strata_core::{ShardingOperator, ShardingValue, SqlType};

use super::{broadcast, generate_for_value, intersect_all, retain_candidates, ShardingStrategy};
use crate::error::StrategyError;

/// Placeholder replaced by the value
pub const TEMPLATE_PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone)]
pub struct TemplateDynamicStrategy {
    columns: Vec<String>,
    template: String,
}

impl TemplateDynamicStrategy {
    pub fn new(column: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            columns: vec![column.into()],
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn generate(&self, values: &[ShardingValue]) -> Result<Vec<String>, StrategyError> {
        let selections = values
            .iter()
            .map(|value| {
                generate_for_value(
                    value,
                    |v| Ok(self.template.replace(TEMPLATE_PLACEHOLDER, &v.to_string())),
                    |_, _| {
                        Err(StrategyError::UnsupportedOperator {
                            strategy: self.name(),
                            operator: ShardingOperator::Between,
                        })
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(intersect_all(selections))
    }
}

impl ShardingStrategy for TemplateDynamicStrategy {
    fn sharding_columns(&self) -> &[String] {
        &self.columns
    }

    fn static_sharding(
        &self,
        sql_type: SqlType,
        candidates: &[String],
        values: &[ShardingValue],
    ) -> Result<Vec<String>, StrategyError> {
        if values.is_empty() {
            return broadcast(sql_type, candidates);
        }
        let generated = self.generate(values)?;
        Ok(retain_candidates(candidates, |name| generated.contains(name)))
    }

    /// Without a value there is nothing to substitute, so this fails
    fn dynamic_sharding(&self, values: &[ShardingValue]) -> Result<Vec<String>, StrategyError> {
        if values.is_empty() {
            return Err(StrategyError::MissingShardingValue { strategy: self.name() });
        }
        self.generate(values)
    }

    fn name(&self) -> &'static str {
        "Template"
    }
}
