//! Physical data node

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

const DELIMITER: char = '.';

/// One real (data source, table) pairing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataNode {
    pub data_source: String,
    pub table: String,
}

impl DataNode {
    pub fn new(data_source: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            table: table.into(),
        }
    }
}

impl FromStr for DataNode {
    type Err = ConfigurationError;

    /// Parse `data_source.table`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(DELIMITER) {
            Some((ds, table)) if !ds.is_empty() && !table.is_empty() && !table.contains(DELIMITER) => {
                Ok(Self::new(ds, table))
            }
            _ => Err(ConfigurationError::InvalidDataNode(s.to_string())),
        }
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.data_source, DELIMITER, self.table)
    }
}
