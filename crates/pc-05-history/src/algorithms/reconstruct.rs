//! Order-preserving zip of stage records and owners.

use shared_types::{
    Address, LedgerError, LifecycleTimeline, RawStageRecord, StageRecord, TimelineEntry,
};

use crate::domain::invariants::{check_parallel_arrays, check_stage_index};

/// Build a timeline from the raw `getHistory` arrays.
///
/// Position `i` of the output pairs `stages[i]` with `owners[i]`.
/// Timestamps are copied unmodified.
pub fn reconstruct(
    stages: Vec<RawStageRecord>,
    owners: Vec<Address>,
) -> Result<LifecycleTimeline, LedgerError> {
    check_parallel_arrays(stages.len(), owners.len())?;

    let entries = stages
        .into_iter()
        .zip(owners)
        .map(|(raw, owner)| {
            let stage = check_stage_index(raw.stage)?;
            Ok(TimelineEntry {
                record: StageRecord {
                    stage,
                    location: raw.location,
                    action: raw.action,
                    timestamp: raw.timestamp,
                },
                owner,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(LifecycleTimeline::new(entries))
}
