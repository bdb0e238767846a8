//! Ports module for the Ledger Query Aggregator

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerQueryApi;
