//! Configuration for the Ledger Transaction Submitter

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Submitter configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Upper bound on the confirm phase (seconds). A transaction that is not
    /// final by then is reported as `LedgerUnreachable`; it may still land.
    pub confirmation_timeout_secs: u64,
    /// Trim surrounding whitespace from text fields before submission.
    pub trim_fields: bool,
}

impl SubmitterConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: 300,
            trim_fields: true,
        }
    }
}
