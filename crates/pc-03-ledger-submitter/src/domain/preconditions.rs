//! Preconditions checked before any ledger round-trip.

use shared_types::{LedgerCall, LedgerError};

/// Reject empty or whitespace-only text for a required field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        Err(LedgerError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Check every required field of `call`.
///
/// Ids and addresses are typed, so they are sanitized by construction.
pub fn check_call(call: &LedgerCall) -> Result<(), LedgerError> {
    match call {
        LedgerCall::AddProduct {
            description,
            location,
            ..
        } => {
            require_text("description", description)?;
            require_text("location", location)
        }
        LedgerCall::UpdateStage {
            location, action, ..
        } => {
            require_text("location", location)?;
            require_text("action", action)
        }
        LedgerCall::TransferOwnership { .. } => Ok(()),
    }
}
