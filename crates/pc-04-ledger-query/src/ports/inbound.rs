//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{LedgerError, ProductId, ProductView, SessionContext};

/// Primary Ledger Query Aggregator API
#[async_trait]
pub trait LedgerQueryApi: Send + Sync {
    /// Snapshot plus reconstructed timeline for `id`, or an error.
    /// Never a partial view.
    async fn fetch_product_view(
        &self,
        session: &SessionContext,
        id: ProductId,
    ) -> Result<ProductView, LedgerError>;
}
