//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{Address, LedgerError, ProductId, Receipt, SessionContext, Stage};

/// Primary Ledger Transaction Submitter API
///
/// Every operation returns only after the ledger confirms (or rejects) the
/// transaction. Retries are not deduplicated: each call is a distinct
/// ledger-level attempt.
#[async_trait]
pub trait LedgerSubmitterApi: Send + Sync {
    /// `addProduct(id, description, location)`
    async fn register_product(
        &self,
        session: &SessionContext,
        id: ProductId,
        description: &str,
        location: &str,
    ) -> Result<Receipt, LedgerError>;

    /// `updateStage(id, stage, location, action)`
    async fn advance_stage(
        &self,
        session: &SessionContext,
        id: ProductId,
        stage: Stage,
        location: &str,
        action: &str,
    ) -> Result<Receipt, LedgerError>;

    /// `transferOwnership(id, new_owner)`
    async fn transfer_ownership(
        &self,
        session: &SessionContext,
        id: ProductId,
        new_owner: Address,
    ) -> Result<Receipt, LedgerError>;
}
