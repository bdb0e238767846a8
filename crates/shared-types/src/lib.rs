//! # Shared Types Crate
//!
//! This crate contains the data model of a product lifecycle record, the
//! error taxonomy surfaced to callers, and the ledger ports consumed by the
//! submitter and query subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Ledger owns state**: Everything here is a request-scoped copy; nothing
//!   is cached across requests.
//! - **Explicit session**: The active account and ledger handle travel in a
//!   [`SessionContext`], never in ambient globals.

pub mod entities;
pub mod errors;
pub mod ledger;
pub mod session;

pub use entities::*;
pub use errors::*;
pub use ledger::*;
pub use session::SessionContext;
