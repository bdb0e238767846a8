//! History Reconstructor Service

use shared_types::{Address, LedgerError, LifecycleTimeline, RawStageRecord};
use tracing::{debug, error};

use crate::algorithms;
use crate::ports::inbound::HistoryReconstructorApi;

/// Stateless reconstructor service.
///
/// Integrity failures are logged at error level: they indicate the ledger
/// returned internally inconsistent data.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryReconstructor;

impl HistoryReconstructor {
    pub fn new() -> Self {
        Self
    }
}

impl HistoryReconstructorApi for HistoryReconstructor {
    fn reconstruct(
        &self,
        stages: Vec<RawStageRecord>,
        owners: Vec<Address>,
    ) -> Result<LifecycleTimeline, LedgerError> {
        let (stage_count, owner_count) = (stages.len(), owners.len());

        match algorithms::reconstruct(stages, owners) {
            Ok(timeline) => {
                debug!(entries = timeline.len(), "[pc-05] Timeline reconstructed");
                Ok(timeline)
            }
            Err(e) => {
                error!(
                    stages = stage_count,
                    owners = owner_count,
                    error = %e,
                    "[pc-05] History failed integrity check"
                );
                Err(e)
            }
        }
    }
}
