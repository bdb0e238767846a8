//! # Provenance Runtime
//!
//! Composition root for Provenance-Chain.
//!
//! ## Responsibilities
//!
//! - **Configuration**: TOML file, environment overrides, validation
//!   ([`config::RuntimeConfig`])
//! - **Session**: explicit [`SessionContext`](shared_types::SessionContext)
//!   built from an untrusted identity provider ([`session`])
//! - **Flows**: [`ProvenanceRuntime`] takes raw user input, sanitizes it and
//!   drives the submitter, query aggregator and QR codec
//!
//! Scan results are passed as typed values into the query path; nothing is
//! routed through simulated input events.

pub mod config;
pub mod runtime;
pub mod session;

pub use config::{ConfigError, LedgerConfig, RuntimeConfig};
pub use runtime::{ProvenanceRuntime, Registration};
pub use session::{connect, reconnect};
