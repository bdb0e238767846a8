//! # PC-03: Ledger Transaction Submitter
//!
//! Wraps the three mutating contract operations (register product, advance
//! stage, transfer ownership) in a two-phase protocol and maps every ledger
//! failure to the typed `LedgerError` taxonomy.
//!
//! ## Architecture
//!
//! - **Domain**: Preconditions, revert classification table
//! - **Ports**: Inbound (`LedgerSubmitterApi`), Outbound (`LedgerMutation`)
//! - **Service**: `LedgerSubmitter`
//!
//! ## Two-Phase Protocol
//!
//! ```text
//! preconditions ──→ submit ──→ pending handle ──→ await_finality ──→ Receipt
//!       │              │                                 │
//!  MissingField    classify(fault)                  classify(fault)
//! ```
//!
//! Submission success is never reported as operation success; only the
//! confirmed receipt is.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::SubmitterConfig;
pub use domain::classification::{
    classify_fault, classify_revert, match_revert, RevertCategory, REVERT_CLASSIFIERS,
};
pub use domain::preconditions::{check_call, require_text};
pub use ports::inbound::LedgerSubmitterApi;
pub use service::LedgerSubmitter;
