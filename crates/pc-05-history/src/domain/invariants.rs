//! # Domain Invariants
//!
//! - Alignment: `len(stage records) == len(owners)`
//! - Stage range: every ledger stage index is in `[0, 5]`

use shared_types::{LedgerError, Stage};

/// Alignment invariant of the two `getHistory` arrays.
pub fn check_parallel_arrays(stages: usize, owners: usize) -> Result<(), LedgerError> {
    if stages == owners {
        Ok(())
    } else {
        Err(LedgerError::LengthMismatch { stages, owners })
    }
}

/// Range check of a raw ledger stage index.
pub fn check_stage_index(index: u64) -> Result<Stage, LedgerError> {
    Stage::from_index(index).ok_or(LedgerError::InvalidStageIndex(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_arrays() {
        assert!(check_parallel_arrays(0, 0).is_ok());
        assert!(check_parallel_arrays(3, 3).is_ok());
        assert_eq!(
            check_parallel_arrays(3, 2),
            Err(LedgerError::LengthMismatch {
                stages: 3,
                owners: 2
            })
        );
    }

    #[test]
    fn test_stage_index() {
        assert_eq!(check_stage_index(0), Ok(Stage::Created));
        assert_eq!(check_stage_index(5), Ok(Stage::Completed));
        assert_eq!(check_stage_index(6), Err(LedgerError::InvalidStageIndex(6)));
    }
}
