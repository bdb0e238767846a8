//! Domain module for the Ledger Transaction Submitter

pub mod classification;
pub mod preconditions;
