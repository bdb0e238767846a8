//! # Error Types
//!
//! The error taxonomy surfaced to callers, plus the raw faults reported by
//! ledger adapters before classification.

use thiserror::Error;

use crate::entities::ProductId;

/// Every failure the core reports to its caller.
///
/// Validation failures (`InvalidId`, `InvalidAddress`, `MissingField`) are
/// produced before any ledger round-trip. Ledger failures are classified at
/// the submitter and query boundaries. Reconstruction failures
/// (`LengthMismatch`, `InvalidStageIndex`) are data-integrity failures and
/// are never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Raw input did not sanitize to a positive `uint256`.
    #[error("invalid product id: {0}")]
    InvalidId(String),

    /// Raw input did not sanitize to a well-formed ledger address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A required text field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A scanned or uploaded image held no readable QR payload.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// The ledger has no product under this id.
    #[error("product not found: {id}")]
    ProductNotFound { id: ProductId },

    /// A product with this id is already registered.
    #[error("product already exists: {id}")]
    DuplicateId { id: ProductId },

    /// History arrays disagree in length.
    #[error("history length mismatch: {stages} stage records, {owners} owners")]
    LengthMismatch { stages: usize, owners: usize },

    /// A ledger stage index outside the lifecycle enumeration.
    #[error("invalid stage index: {0}")]
    InvalidStageIndex(u64),

    /// The ledger rejected the operation for an unrecognized reason.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// The ledger could not be contacted.
    #[error("ledger unreachable: {0}")]
    LedgerUnreachable(String),
}

impl LedgerError {
    /// Returns true for failures detected before contacting the ledger.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::InvalidAddress(_) | Self::MissingField(_)
        )
    }

    /// Returns true for reconstruction invariant violations.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::InvalidStageIndex(_)
        )
    }

    /// Stable category name, used as a metrics label.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "invalid_id",
            Self::InvalidAddress(_) => "invalid_address",
            Self::MissingField(_) => "missing_field",
            Self::DecodeFailed(_) => "decode_failed",
            Self::ProductNotFound { .. } => "product_not_found",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::InvalidStageIndex(_) => "invalid_stage_index",
            Self::OperationFailed(_) => "operation_failed",
            Self::LedgerUnreachable(_) => "ledger_unreachable",
        }
    }
}

/// Unclassified failure reported by a ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerFault {
    /// The contract reverted; `reason` is its revert string (may be empty).
    #[error("reverted: {reason}")]
    Reverted { reason: String },

    /// The ledger answered but refused the request without a contract
    /// revert (nonce too low, insufficient funds, invalid opcode).
    #[error("rejected: {0}")]
    Rejected(String),

    /// Transport-level failure (connection refused, timeout, HTTP error).
    #[error("transport: {0}")]
    Transport(String),

    /// The ledger answered with data that could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl LedgerFault {
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: reason.into(),
        }
    }
}

/// Why a string is not a canonical product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductIdFormatError {
    #[error("no digits")]
    Empty,
    #[error("contains non-digit characters")]
    NonDigit,
    #[error("zero is not a valid product id")]
    Zero,
    #[error("exceeds uint256")]
    Overflow,
}

/// Why a string is not a valid ledger address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressFormatError {
    #[error("expected 40 hex digits, found {0}")]
    BadLength(usize),
    #[error("contains non-hex characters")]
    NonHex,
    #[error("bad EIP-55 checksum")]
    BadChecksum,
}

/// Stage name or index outside the lifecycle enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::LengthMismatch {
            stages: 3,
            owners: 2,
        };
        assert_eq!(
            err.to_string(),
            "history length mismatch: 3 stage records, 2 owners"
        );

        let id = ProductId::from_u64(1001).unwrap();
        assert_eq!(
            LedgerError::DuplicateId { id }.to_string(),
            "product already exists: 1001"
        );
    }

    #[test]
    fn test_error_groups() {
        assert!(LedgerError::InvalidId("x".into()).is_validation());
        assert!(LedgerError::MissingField("location").is_validation());
        assert!(!LedgerError::LedgerUnreachable("down".into()).is_validation());
        assert!(LedgerError::InvalidStageIndex(9).is_data_integrity());
        assert!(!LedgerError::OperationFailed("nope".into()).is_data_integrity());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(
            LedgerError::OperationFailed("x".into()).category(),
            "operation_failed"
        );
        assert_eq!(
            LedgerError::LedgerUnreachable("x".into()).category(),
            "ledger_unreachable"
        );
    }
}
