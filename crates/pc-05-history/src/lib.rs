//! # PC-05: History Reconstructor
//!
//! Merges the parallel arrays returned by `getHistory` (stage, location,
//! action, timestamp and owner-at-step) into one ordered `LifecycleTimeline`.
//!
//! ## Architecture
//!
//! - **Domain**: Invariants (array alignment, stage range)
//! - **Algorithms**: Order-preserving, range-checked zip
//! - **Ports**: Inbound (`HistoryReconstructorApi`)
//! - **Service**: `HistoryReconstructor`
//!
//! Reconstruction never truncates and never defaults: a length mismatch or
//! an out-of-range stage fails the whole query.

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

pub use algorithms::reconstruct;
pub use domain::invariants::{check_parallel_arrays, check_stage_index};
pub use ports::inbound::HistoryReconstructorApi;
pub use service::HistoryReconstructor;
