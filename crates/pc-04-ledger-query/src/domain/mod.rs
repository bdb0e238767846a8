//! Domain module for the Ledger Query Aggregator

pub mod consistency;
pub mod snapshot;
