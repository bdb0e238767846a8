//! # Session Context
//!
//! The active account and the ledger handle for one user session, passed
//! explicitly into every operation.

use std::fmt;
use std::sync::Arc;

use crate::entities::Address;
use crate::ledger::Ledger;

/// Explicit per-session state.
///
/// Cloning is cheap; the ledger handle is shared.
#[derive(Clone)]
pub struct SessionContext {
    account: Address,
    ledger: Arc<dyn Ledger>,
}

impl SessionContext {
    /// `account` must already be sanitized.
    pub fn new(account: Address, ledger: Arc<dyn Ledger>) -> Self {
        Self { account, ledger }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Same ledger, different account (wallet account switch).
    pub fn with_account(&self, account: Address) -> Self {
        Self {
            account,
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}
