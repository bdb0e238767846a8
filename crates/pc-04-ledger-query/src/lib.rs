//! # PC-04: Ledger Query Aggregator
//!
//! Describes one product by issuing the two ledger reads it needs
//! (`getProduct` snapshot and `getHistory` parallel arrays) and handing the
//! arrays to the History Reconstructor.
//!
//! ## Architecture
//!
//! - **Domain**: Snapshot validation, snapshot/history consistency check
//! - **Ports**: Inbound (`LedgerQueryApi`), Outbound (`LedgerQuery`)
//! - **Service**: `LedgerQueryAggregator`
//!
//! ## Read Model
//!
//! The two reads run concurrently and are not atomic: a mutation may land
//! between them. Either read failing fails the whole request, so a caller
//! never receives a snapshot without a timeline or the reverse. The optional
//! consistency guard re-reads the pair when the snapshot's stage disagrees
//! with the last history record; it never assumes the ledger is atomic.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::QueryConfig;
pub use domain::consistency::is_consistent;
pub use domain::snapshot::{classify_read_fault, validate_snapshot};
pub use ports::inbound::LedgerQueryApi;
pub use service::LedgerQueryAggregator;
