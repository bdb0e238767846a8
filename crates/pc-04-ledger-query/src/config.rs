//! Configuration for the Ledger Query Aggregator

use serde::{Deserialize, Serialize};

/// Query configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Re-read when the snapshot stage disagrees with the last history entry
    pub consistency_guard: bool,
    /// Extra read pairs issued by the guard before giving up
    pub max_consistency_retries: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            consistency_guard: true,
            max_consistency_retries: 2,
        }
    }
}
