//! Ports module for the Ledger Transaction Submitter

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerSubmitterApi;
