//! Ledger Query Aggregator Service

use async_trait::async_trait;
use pc_05_history::{HistoryReconstructor, HistoryReconstructorApi};
use shared_types::{LedgerError, ProductId, ProductView, SessionContext};
use tracing::{debug, info, warn};

use crate::config::QueryConfig;
use crate::domain::consistency::is_consistent;
use crate::domain::snapshot::{classify_read_fault, validate_snapshot};
use crate::ports::inbound::LedgerQueryApi;

/// Ledger Query Aggregator
///
/// Holds no product state between requests; every call re-reads the ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerQueryAggregator {
    config: QueryConfig,
    reconstructor: HistoryReconstructor,
}

impl LedgerQueryAggregator {
    /// Create a new aggregator with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new aggregator with custom config
    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            reconstructor: HistoryReconstructor::new(),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// One snapshot read and one history read, issued concurrently.
    async fn read_pair(
        &self,
        session: &SessionContext,
        id: ProductId,
    ) -> Result<ProductView, LedgerError> {
        let ledger = session.ledger();
        let (snapshot, history) = tokio::join!(ledger.get_product(id), ledger.get_history(id));

        let snapshot = snapshot.map_err(|fault| {
            debug!(product_id = %id, fault = %fault, "[pc-04] Snapshot read failed");
            classify_read_fault(fault, id)
        })?;
        let history = history.map_err(|fault| {
            debug!(product_id = %id, fault = %fault, "[pc-04] History read failed");
            classify_read_fault(fault, id)
        })?;

        let product = validate_snapshot(snapshot, id)?;
        let timeline = self
            .reconstructor
            .reconstruct(history.records, history.owners)?;

        Ok(ProductView { product, timeline })
    }
}

#[async_trait]
impl LedgerQueryApi for LedgerQueryAggregator {
    async fn fetch_product_view(
        &self,
        session: &SessionContext,
        id: ProductId,
    ) -> Result<ProductView, LedgerError> {
        let mut retries = 0;

        loop {
            let view = self.read_pair(session, id).await?;

            if !self.config.consistency_guard || is_consistent(&view) {
                info!(
                    product_id = %id,
                    stage = %view.product.current_stage,
                    entries = view.timeline.len(),
                    "[pc-04] Product view assembled"
                );
                return Ok(view);
            }

            if retries >= self.config.max_consistency_retries {
                warn!(
                    product_id = %id,
                    snapshot_stage = %view.product.current_stage,
                    retries,
                    "[pc-04] Snapshot and history still disagree, returning last read"
                );
                return Ok(view);
            }

            retries += 1;
            debug!(product_id = %id, retries, "[pc-04] Snapshot/history race, re-reading");
        }
    }
}
