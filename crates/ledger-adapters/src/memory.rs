//! In-memory simulation of the supply-chain contract.
//!
//! Mirrors the contract's observable behavior: registration appends the
//! first history record, stage updates append further records, ownership
//! transfers change the owner without a record. Submission dry-runs the
//! call (the way a wallet estimates gas) and finality applies it, so the
//! ledger, not the caller, is the serialization point.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    Address, IdentityProvider, LedgerCall, LedgerFault, LedgerMutation, LedgerQuery,
    PendingTransaction, ProductId, RawHistory, RawProduct, RawStageRecord, Receipt, Stage,
    TxHash,
};
use tracing::debug;

pub const PRODUCT_EXISTS: &str = "Product exists";
pub const PRODUCT_MISSING: &str = "Product does not exist";
pub const ONLY_OWNER: &str = "Only owner";

/// Timestamp of the first simulated block.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Debug, Clone)]
struct StoredProduct {
    description: String,
    owner: Address,
    location: String,
    stage: Stage,
    history: Vec<(RawStageRecord, Address)>,
}

#[derive(Debug)]
struct LedgerState {
    products: HashMap<ProductId, StoredProduct>,
    block: u64,
    nonce: u64,
    accounts: Vec<String>,
}

impl LedgerState {
    /// Contract checks for `call` sent by `from`.
    fn check(&self, from: Address, call: &LedgerCall) -> Result<(), LedgerFault> {
        let id = call.product_id();
        match (call, self.products.get(&id)) {
            (LedgerCall::AddProduct { .. }, Some(_)) => Err(LedgerFault::reverted(PRODUCT_EXISTS)),
            (LedgerCall::AddProduct { .. }, None) => Ok(()),
            (_, None) => Err(LedgerFault::reverted(PRODUCT_MISSING)),
            (_, Some(product)) if product.owner != from => Err(LedgerFault::reverted(ONLY_OWNER)),
            (_, Some(_)) => Ok(()),
        }
    }

    /// Mine `call` in a new block.
    fn apply(&mut self, from: Address, call: LedgerCall) -> Result<u64, LedgerFault> {
        self.check(from, &call)?;
        self.block += 1;
        let timestamp = GENESIS_TIMESTAMP + self.block;

        match call {
            LedgerCall::AddProduct {
                id,
                description,
                location,
            } => {
                let record = RawStageRecord {
                    stage: u64::from(Stage::Created.index()),
                    location: location.clone(),
                    action: "Product registered".to_string(),
                    timestamp,
                };
                self.products.insert(
                    id,
                    StoredProduct {
                        description,
                        owner: from,
                        location,
                        stage: Stage::Created,
                        history: vec![(record, from)],
                    },
                );
            }
            LedgerCall::UpdateStage {
                id,
                stage,
                location,
                action,
            } => {
                let product = self
                    .products
                    .get_mut(&id)
                    .ok_or_else(|| LedgerFault::reverted(PRODUCT_MISSING))?;
                product.stage = stage;
                product.location = location.clone();
                product.history.push((
                    RawStageRecord {
                        stage: u64::from(stage.index()),
                        location,
                        action,
                        timestamp,
                    },
                    product.owner,
                ));
            }
            LedgerCall::TransferOwnership { id, new_owner } => {
                let product = self
                    .products
                    .get_mut(&id)
                    .ok_or_else(|| LedgerFault::reverted(PRODUCT_MISSING))?;
                product.owner = new_owner;
            }
        }

        Ok(self.block)
    }
}

/// Deterministic in-memory ledger.
///
/// Clones share state. Also acts as an identity provider handing out the
/// configured raw account strings.
#[derive(Clone)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                products: HashMap::new(),
                block: 0,
                nonce: 0,
                accounts: Vec::new(),
            })),
        }
    }

    /// Ledger whose identity provider reports `account` verbatim.
    pub fn with_account(account: impl Into<String>) -> Self {
        let ledger = Self::new();
        ledger.state.lock().accounts.push(account.into());
        ledger
    }

    /// Make `account` the active one reported to the identity provider.
    pub fn switch_account(&self, account: impl Into<String>) {
        self.state.lock().accounts.insert(0, account.into());
    }

    pub fn block_number(&self) -> u64 {
        self.state.lock().block
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().products.len()
    }
}

#[async_trait]
impl LedgerQuery for InMemoryLedger {
    async fn get_product(&self, id: ProductId) -> Result<RawProduct, LedgerFault> {
        let state = self.state.lock();
        let product = state
            .products
            .get(&id)
            .ok_or_else(|| LedgerFault::reverted(PRODUCT_MISSING))?;

        Ok(RawProduct {
            id: id.value(),
            description: product.description.clone(),
            owner: product.owner,
            location: product.location.clone(),
            stage: u64::from(product.stage.index()),
            is_ethical: true,
            is_compliant: true,
        })
    }

    async fn get_history(&self, id: ProductId) -> Result<RawHistory, LedgerFault> {
        let state = self.state.lock();
        let product = state
            .products
            .get(&id)
            .ok_or_else(|| LedgerFault::reverted(PRODUCT_MISSING))?;

        let (records, owners) = product.history.iter().cloned().unzip();
        Ok(RawHistory { records, owners })
    }
}

#[async_trait]
impl LedgerMutation for InMemoryLedger {
    async fn submit(
        &self,
        from: Address,
        call: LedgerCall,
    ) -> Result<Box<dyn PendingTransaction>, LedgerFault> {
        let nonce = {
            let mut state = self.state.lock();
            state.check(from, &call)?;
            state.nonce += 1;
            state.nonce
        };
        debug!(method = call.method(), nonce, "[ledger-memory] Transaction accepted");

        Ok(Box::new(MemoryPending {
            state: Arc::clone(&self.state),
            tx_hash: TxHash::from_low_u64_be(nonce),
            from,
            call,
        }))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryLedger {
    async fn request_account(&self) -> Result<String, LedgerFault> {
        self.state
            .lock()
            .accounts
            .first()
            .cloned()
            .ok_or_else(|| LedgerFault::Transport("no account connected".into()))
    }
}

struct MemoryPending {
    state: Arc<Mutex<LedgerState>>,
    tx_hash: TxHash,
    from: Address,
    call: LedgerCall,
}

#[async_trait]
impl PendingTransaction for MemoryPending {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn await_finality(self: Box<Self>) -> Result<Receipt, LedgerFault> {
        let MemoryPending {
            state,
            tx_hash,
            from,
            call,
        } = *self;
        let block_number = state.lock().apply(from, call)?;
        Ok(Receipt {
            tx_hash,
            block_number,
        })
    }
}
