//! Snapshot validation and read-fault mapping.

use pc_05_history::check_stage_index;
use shared_types::{LedgerError, LedgerFault, Product, ProductId, RawProduct};

/// Map a failed read of `id` to the caller-facing error.
///
/// Any ledger-side failure means the product cannot be described, so it is
/// reported as not found. Transport failures keep their own category.
pub fn classify_read_fault(fault: LedgerFault, id: ProductId) -> LedgerError {
    match fault {
        LedgerFault::Transport(msg) => LedgerError::LedgerUnreachable(msg),
        LedgerFault::Reverted { .. } | LedgerFault::Rejected(_) | LedgerFault::Malformed(_) => {
            LedgerError::ProductNotFound { id }
        }
    }
}

/// Turn the raw `getProduct` tuple into a `Product`.
///
/// A contract that answers unknown ids with a zeroed tuple instead of a
/// revert yields `id == 0`; that, or any id other than the requested one,
/// is reported as not found.
pub fn validate_snapshot(raw: RawProduct, requested: ProductId) -> Result<Product, LedgerError> {
    if raw.id != requested.value() {
        return Err(LedgerError::ProductNotFound { id: requested });
    }

    Ok(Product {
        id: requested,
        description: raw.description,
        current_owner: raw.owner,
        location: raw.location,
        current_stage: check_stage_index(raw.stage)?,
        is_ethical: raw.is_ethical,
        is_compliant: raw.is_compliant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, Stage, U256};

    fn raw(id: u64, stage: u64) -> RawProduct {
        RawProduct {
            id: U256::from(id),
            description: "Widget".into(),
            owner: Address::from_bytes([0x11; 20]),
            location: "Mumbai".into(),
            stage,
            is_ethical: true,
            is_compliant: false,
        }
    }

    fn id(n: u64) -> ProductId {
        ProductId::from_u64(n).unwrap()
    }

    #[test]
    fn test_valid_snapshot() {
        let product = validate_snapshot(raw(1001, 1), id(1001)).unwrap();
        assert_eq!(product.current_stage, Stage::InProduction);
        assert_eq!(product.current_owner, Address::from_bytes([0x11; 20]));
        assert!(product.is_ethical);
        assert!(!product.is_compliant);
    }

    #[test]
    fn test_zeroed_tuple_is_not_found() {
        assert_eq!(
            validate_snapshot(raw(0, 0), id(1001)),
            Err(LedgerError::ProductNotFound { id: id(1001) })
        );
    }

    #[test]
    fn test_stage_out_of_range() {
        assert_eq!(
            validate_snapshot(raw(1001, 6), id(1001)),
            Err(LedgerError::InvalidStageIndex(6))
        );
    }

    #[test]
    fn test_read_faults() {
        assert_eq!(
            classify_read_fault(LedgerFault::reverted("Product does not exist"), id(9)),
            LedgerError::ProductNotFound { id: id(9) }
        );
        assert_eq!(
            classify_read_fault(LedgerFault::Malformed("empty return data".into()), id(9)),
            LedgerError::ProductNotFound { id: id(9) }
        );
        assert_eq!(
            classify_read_fault(LedgerFault::Rejected("invalid opcode".into()), id(9)),
            LedgerError::ProductNotFound { id: id(9) }
        );
        assert_eq!(
            classify_read_fault(LedgerFault::Transport("timeout".into()), id(9)),
            LedgerError::LedgerUnreachable("timeout".into())
        );
    }
}
