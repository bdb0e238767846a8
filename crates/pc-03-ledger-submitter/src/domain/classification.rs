//! # Revert Classification
//!
//! Ledger failures are mapped to `LedgerError` through an ordered table of
//! revert-reason fragments. Matching is case-insensitive substring search;
//! the first matching row wins. Reasons matching no row are reported as
//! `OperationFailed` with the raw reason attached.

use shared_types::{LedgerError, LedgerFault, ProductId};

/// Typed category a revert reason can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertCategory {
    DuplicateId,
    ProductNotFound,
}

/// Reason fragment (lowercase) → category.
pub const REVERT_CLASSIFIERS: &[(&str, RevertCategory)] = &[
    ("does not exist", RevertCategory::ProductNotFound),
    ("not found", RevertCategory::ProductNotFound),
    ("nonexistent", RevertCategory::ProductNotFound),
    ("already exists", RevertCategory::DuplicateId),
    ("product exists", RevertCategory::DuplicateId),
    ("duplicate", RevertCategory::DuplicateId),
];

const NO_REASON: &str = "reverted without a reason";

/// Look up `reason` in [`REVERT_CLASSIFIERS`].
pub fn match_revert(reason: &str) -> Option<RevertCategory> {
    let reason = reason.to_ascii_lowercase();
    REVERT_CLASSIFIERS
        .iter()
        .find(|(fragment, _)| reason.contains(fragment))
        .map(|(_, category)| *category)
}

/// Classify a contract revert for the operation on `id`.
pub fn classify_revert(reason: &str, id: ProductId) -> LedgerError {
    match match_revert(reason) {
        Some(RevertCategory::DuplicateId) => LedgerError::DuplicateId { id },
        Some(RevertCategory::ProductNotFound) => LedgerError::ProductNotFound { id },
        None if reason.trim().is_empty() => LedgerError::OperationFailed(NO_REASON.to_string()),
        None => LedgerError::OperationFailed(reason.to_string()),
    }
}

/// Classify any adapter fault for the operation on `id`.
pub fn classify_fault(fault: LedgerFault, id: ProductId) -> LedgerError {
    match fault {
        LedgerFault::Reverted { reason } => classify_revert(&reason, id),
        LedgerFault::Transport(msg) => LedgerError::LedgerUnreachable(msg),
        LedgerFault::Rejected(msg) | LedgerFault::Malformed(msg) => {
            LedgerError::OperationFailed(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ProductId {
        ProductId::from_u64(1001).unwrap()
    }

    #[test]
    fn test_fragments_are_lowercase() {
        for (fragment, _) in REVERT_CLASSIFIERS {
            assert_eq!(*fragment, fragment.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_known_reasons() {
        assert_eq!(
            classify_revert("Product exists", id()),
            LedgerError::DuplicateId { id: id() }
        );
        assert_eq!(
            classify_revert("execution reverted: Product already exists", id()),
            LedgerError::DuplicateId { id: id() }
        );
        assert_eq!(
            classify_revert("Product does not exist", id()),
            LedgerError::ProductNotFound { id: id() }
        );
        assert_eq!(
            classify_revert("PRODUCT NOT FOUND", id()),
            LedgerError::ProductNotFound { id: id() }
        );
    }

    #[test]
    fn test_unknown_reason_keeps_raw_text() {
        assert_eq!(
            classify_revert("Only owner", id()),
            LedgerError::OperationFailed("Only owner".into())
        );
        assert_eq!(
            classify_revert("  ", id()),
            LedgerError::OperationFailed(NO_REASON.into())
        );
    }

    #[test]
    fn test_fault_kinds() {
        assert_eq!(
            classify_fault(LedgerFault::Transport("connection refused".into()), id()),
            LedgerError::LedgerUnreachable("connection refused".into())
        );
        assert_eq!(
            classify_fault(LedgerFault::Malformed("short receipt".into()), id()),
            LedgerError::OperationFailed("short receipt".into())
        );
        assert_eq!(
            classify_fault(LedgerFault::reverted("Product exists"), id()),
            LedgerError::DuplicateId { id: id() }
        );
    }

    #[test]
    fn test_node_rejection_is_operation_failure() {
        let reason = "insufficient funds for gas * price + value (code -32000)";
        assert_eq!(
            classify_fault(LedgerFault::Rejected(reason.into()), id()),
            LedgerError::OperationFailed(reason.into())
        );
    }
}
