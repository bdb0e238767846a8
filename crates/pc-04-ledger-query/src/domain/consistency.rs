//! Cross-read consistency check.

use shared_types::ProductView;

/// True when the snapshot stage matches the most recent history record.
///
/// An empty timeline has nothing to compare against and passes.
pub fn is_consistent(view: &ProductView) -> bool {
    view.timeline
        .latest()
        .map_or(true, |entry| entry.record.stage == view.product.current_stage)
}
