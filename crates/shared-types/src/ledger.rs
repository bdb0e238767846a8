//! # Ledger Ports
//!
//! The external contract consumed by the core. Adapters (JSON-RPC node,
//! in-memory simulation) implement these traits; the submitter and query
//! subsystems depend only on them.
//!
//! ## Two-phase mutation
//!
//! ```text
//! LedgerMutation::submit ──→ PendingTransaction ──await_finality──→ Receipt
//!          │                                               │
//!          └──── LedgerFault (rejected on submit) ─────────┴── LedgerFault (reverted)
//! ```
//!
//! A successful `submit` is not a successful operation; only the receipt
//! returned by `await_finality` is authoritative.

use async_trait::async_trait;

use crate::entities::{Address, ProductId, RawHistory, RawProduct, Receipt, Stage, TxHash};
use crate::errors::LedgerFault;

/// Read side of the supply-chain contract.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// `getProduct(uint256)`: current snapshot tuple.
    async fn get_product(&self, id: ProductId) -> Result<RawProduct, LedgerFault>;

    /// `getHistory(uint256)`: stage records and owners as parallel arrays.
    async fn get_history(&self, id: ProductId) -> Result<RawHistory, LedgerFault>;
}

/// A mutating contract call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    /// `addProduct(uint256,string,string)`
    AddProduct {
        id: ProductId,
        description: String,
        location: String,
    },
    /// `updateStage(uint256,uint8,string,string)`
    UpdateStage {
        id: ProductId,
        stage: Stage,
        location: String,
        action: String,
    },
    /// `transferOwnership(uint256,address)`
    TransferOwnership { id: ProductId, new_owner: Address },
}

impl LedgerCall {
    /// Contract function name, for logs and metrics.
    pub fn method(&self) -> &'static str {
        match self {
            LedgerCall::AddProduct { .. } => "addProduct",
            LedgerCall::UpdateStage { .. } => "updateStage",
            LedgerCall::TransferOwnership { .. } => "transferOwnership",
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            LedgerCall::AddProduct { id, .. }
            | LedgerCall::UpdateStage { id, .. }
            | LedgerCall::TransferOwnership { id, .. } => *id,
        }
    }
}

/// Write side of the supply-chain contract.
#[async_trait]
pub trait LedgerMutation: Send + Sync {
    /// Send `call` on behalf of `from`, returning a handle to the pending
    /// transaction. Signing is delegated to the node or wallet behind the
    /// adapter.
    async fn submit(
        &self,
        from: Address,
        call: LedgerCall,
    ) -> Result<Box<dyn PendingTransaction>, LedgerFault>;
}

/// Handle to a submitted, not-yet-final transaction.
#[async_trait]
pub trait PendingTransaction: Send {
    fn tx_hash(&self) -> TxHash;

    /// Suspend until the ledger reports finality. Yields the receipt on
    /// success or the structured revert on failure.
    async fn await_finality(self: Box<Self>) -> Result<Receipt, LedgerFault>;
}

/// A ledger that can be both read and written.
pub trait Ledger: LedgerQuery + LedgerMutation {}

impl<T: LedgerQuery + LedgerMutation> Ledger for T {}

/// Supplies the active account of the current session (wallet extension,
/// node account list). The value is untrusted raw text.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn request_account(&self) -> Result<String, LedgerFault>;
}
