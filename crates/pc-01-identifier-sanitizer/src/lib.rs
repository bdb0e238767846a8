//! # PC-01: Identifier Sanitizer
//!
//! Normalizes free-text, camera-decoded or file-decoded product identifiers
//! and wallet addresses into the canonical forms accepted by the ledger.
//!
//! ## Architecture
//!
//! - **Domain**: Pure sanitizing functions (no I/O, no side effects)
//! - **Ports**: Inbound (`IdentifierSanitizerApi`)
//! - **Service**: `IdentifierSanitizer`, logging rejected input
//!
//! Every address source (wallet-provided or typed) goes through the same
//! path; a value handed over by a wallet extension is not trusted as
//! canonical.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{clean_address_text, sanitize_address, sanitize_product_id};
pub use ports::inbound::IdentifierSanitizerApi;
pub use service::IdentifierSanitizer;
