//! # Runtime Configuration
//!
//! Unified configuration for the subsystems and the ledger connection.
//!
//! Resolution order: defaults, then the optional TOML file, then
//! environment overrides, then [`RuntimeConfig::validate`].
//!
//! ```toml
//! [ledger]
//! rpc_url = "http://127.0.0.1:8545"
//! contract_address_file = "frontend/src/contractAddress.json"
//!
//! [submitter]
//! confirmation_timeout_secs = 120
//!
//! [query]
//! consistency_guard = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ledger_adapters::RpcConfig;
use pc_01_identifier_sanitizer::sanitize_address;
use pc_02_qr_codec::{ScannerConfig, MAX_FPS};
use pc_03_ledger_submitter::SubmitterConfig;
use pc_04_ledger_query::QueryConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("no contract address: set ledger.contract_address, ledger.contract_address_file or PC_CONTRACT_ADDRESS")]
    MissingContract,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Ledger connection.
    pub ledger: LedgerConfig,
    /// Transaction submitter.
    pub submitter: SubmitterConfig,
    /// Query aggregator.
    pub query: QueryConfig,
    /// QR scanner.
    pub scanner: ScannerConfig,
}

/// Ledger connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the node or wallet bridge.
    pub rpc_url: String,
    /// Contract address; takes precedence over `contract_address_file`.
    pub contract_address: Option<String>,
    /// Deployment artifact of the form `{"address": "0x..."}`.
    pub contract_address_file: Option<PathBuf>,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Receipt polling interval.
    pub receipt_poll_interval_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: None,
            contract_address_file: None,
            request_timeout_secs: 10,
            receipt_poll_interval_ms: 500,
        }
    }
}

#[derive(Deserialize)]
struct DeploymentArtifact {
    address: String,
}

impl LedgerConfig {
    /// Resolve and sanitize the contract address.
    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        let raw = match (&self.contract_address, &self.contract_address_file) {
            (Some(address), _) => address.clone(),
            (None, Some(path)) => read_artifact(path)?,
            (None, None) => return Err(ConfigError::MissingContract),
        };

        sanitize_address(&raw).map_err(|e| ConfigError::Invalid(format!("contract address: {e}")))
    }

    /// Connection settings for the JSON-RPC adapter.
    pub fn rpc_config(&self) -> Result<RpcConfig, ConfigError> {
        let mut rpc = RpcConfig::new(self.rpc_url.clone(), self.contract_address()?);
        rpc.request_timeout = Duration::from_secs(self.request_timeout_secs);
        rpc.receipt_poll_interval = Duration::from_millis(self.receipt_poll_interval_ms);
        Ok(rpc)
    }
}

fn read_artifact(path: &Path) -> Result<String, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: DeploymentArtifact =
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(artifact.address)
}

impl RuntimeConfig {
    /// Load from `path` (if any), apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from `lookup`.
    ///
    /// - `PC_RPC_URL`
    /// - `PC_CONTRACT_ADDRESS`
    /// - `PC_CONTRACT_ADDRESS_FILE`
    /// - `PC_CONFIRMATION_TIMEOUT_SECS`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PC_RPC_URL") {
            self.ledger.rpc_url = url;
        }
        if let Some(address) = lookup("PC_CONTRACT_ADDRESS") {
            self.ledger.contract_address = Some(address);
        }
        if let Some(path) = lookup("PC_CONTRACT_ADDRESS_FILE") {
            self.ledger.contract_address_file = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("PC_CONFIRMATION_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.submitter.confirmation_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "PC_CONFIRMATION_TIMEOUT_SECS is not a number, ignored"),
            }
        }
    }

    /// Reject values no subsystem can run with.
    ///
    /// The contract address is checked when a ledger connection is built,
    /// since in-memory runs do not need one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.ledger.rpc_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "ledger.rpc_url must be http(s), got {url:?}"
            )));
        }
        if self.ledger.receipt_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "ledger.receipt_poll_interval_ms must be positive".into(),
            ));
        }
        if self.submitter.confirmation_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "submitter.confirmation_timeout_secs must be positive".into(),
            ));
        }
        if self.scanner.max_fps == 0 || self.scanner.max_fps > MAX_FPS {
            return Err(ConfigError::Invalid(format!(
                "scanner.max_fps must be in 1..={MAX_FPS}, got {}",
                self.scanner.max_fps
            )));
        }
        if self.scanner.upload_symbologies.is_empty() {
            return Err(ConfigError::Invalid(
                "scanner.upload_symbologies must not be empty".into(),
            ));
        }
        Ok(())
    }
}
