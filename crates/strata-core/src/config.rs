//! Configuration module for the strata router

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Router engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sharding rule document loaded at startup
    pub rule_file: Option<PathBuf>,

    /// Log every routing result at info level
    #[serde(default)]
    pub sql_show: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        // Rule document
        if let Ok(path) = std::env::var("STRATA_RULE_FILE") {
            let path = path.trim();
            if !path.is_empty() {
                config.rule_file = Some(PathBuf::from(path));
            }
        }

        // Routing result logging
        if let Ok(show) = std::env::var("STRATA_SQL_SHOW") {
            config.sql_show = parse_flag(&show);
        }

        debug!(
            rule_file = ?config.rule_file,
            sql_show = config.sql_show,
            "Loaded engine config from environment"
        );

        config
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
