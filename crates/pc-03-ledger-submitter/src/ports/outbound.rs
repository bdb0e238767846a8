//! Outbound Ports (Driven Ports / SPI)
//!
//! The submitter drives the shared ledger mutation port through the
//! session's ledger handle.

pub use shared_types::{LedgerMutation, PendingTransaction};
