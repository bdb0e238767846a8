//! Inbound Ports (Driving Ports / API)

use shared_types::{Address, LedgerError, LifecycleTimeline, RawStageRecord};

/// Primary History Reconstructor API
pub trait HistoryReconstructorApi: Send + Sync {
    /// Zip the `getHistory` arrays into a timeline.
    ///
    /// Fails with `LengthMismatch` or `InvalidStageIndex`; never truncates.
    fn reconstruct(
        &self,
        stages: Vec<RawStageRecord>,
        owners: Vec<Address>,
    ) -> Result<LifecycleTimeline, LedgerError>;
}
