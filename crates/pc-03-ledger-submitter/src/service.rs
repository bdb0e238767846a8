//! Ledger Transaction Submitter Service

use async_trait::async_trait;
use shared_types::{
    Address, LedgerCall, LedgerError, ProductId, Receipt, SessionContext, Stage,
};
use tracing::{debug, info, warn};

use crate::config::SubmitterConfig;
use crate::domain::classification::classify_fault;
use crate::domain::preconditions::check_call;
use crate::ports::inbound::LedgerSubmitterApi;

/// Ledger Transaction Submitter
///
/// Stateless apart from its config; the ledger handle and the sending
/// account come from the `SessionContext` of each call.
#[derive(Debug, Clone, Default)]
pub struct LedgerSubmitter {
    config: SubmitterConfig,
}

impl LedgerSubmitter {
    /// Create a new submitter with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new submitter with custom config
    pub fn with_config(config: SubmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    fn text(&self, value: &str) -> String {
        if self.config.trim_fields {
            value.trim().to_string()
        } else {
            value.to_string()
        }
    }

    /// Run one call through preconditions, submit and confirm.
    async fn execute(
        &self,
        session: &SessionContext,
        call: LedgerCall,
    ) -> Result<Receipt, LedgerError> {
        let id = call.product_id();
        let method = call.method();

        if let Err(e) = check_call(&call) {
            debug!(method, product_id = %id, error = %e, "[pc-03] Precondition failed");
            return Err(e);
        }

        info!(
            method,
            product_id = %id,
            from = %session.account(),
            "[pc-03] Submitting transaction"
        );

        let pending = session
            .ledger()
            .submit(session.account(), call)
            .await
            .map_err(|fault| {
                let e = classify_fault(fault, id);
                warn!(method, product_id = %id, error = %e, "[pc-03] Submission rejected");
                e
            })?;

        let tx_hash = pending.tx_hash();
        debug!(method, tx_hash = ?tx_hash, "[pc-03] Awaiting finality");

        let timeout = self.config.confirmation_timeout();
        let finality = tokio::time::timeout(timeout, pending.await_finality())
            .await
            .map_err(|_| {
                warn!(
                    method,
                    tx_hash = ?tx_hash,
                    timeout_secs = timeout.as_secs(),
                    "[pc-03] Confirmation timed out"
                );
                LedgerError::LedgerUnreachable(format!(
                    "transaction {tx_hash:?} not final after {}s",
                    timeout.as_secs()
                ))
            })?;

        let receipt = finality.map_err(|fault| {
            let e = classify_fault(fault, id);
            warn!(
                method,
                product_id = %id,
                tx_hash = ?tx_hash,
                error = %e,
                "[pc-03] Transaction reverted"
            );
            e
        })?;

        info!(
            method,
            product_id = %id,
            tx_hash = ?receipt.tx_hash,
            block = receipt.block_number,
            "[pc-03] Transaction confirmed"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl LedgerSubmitterApi for LedgerSubmitter {
    async fn register_product(
        &self,
        session: &SessionContext,
        id: ProductId,
        description: &str,
        location: &str,
    ) -> Result<Receipt, LedgerError> {
        let call = LedgerCall::AddProduct {
            id,
            description: self.text(description),
            location: self.text(location),
        };
        self.execute(session, call).await
    }

    async fn advance_stage(
        &self,
        session: &SessionContext,
        id: ProductId,
        stage: Stage,
        location: &str,
        action: &str,
    ) -> Result<Receipt, LedgerError> {
        let call = LedgerCall::UpdateStage {
            id,
            stage,
            location: self.text(location),
            action: self.text(action),
        };
        self.execute(session, call).await
    }

    async fn transfer_ownership(
        &self,
        session: &SessionContext,
        id: ProductId,
        new_owner: Address,
    ) -> Result<Receipt, LedgerError> {
        self.execute(session, LedgerCall::TransferOwnership { id, new_owner })
            .await
    }
}
