//! Session setup from an identity provider.
//!
//! The provider's account is untrusted text: it is sanitized like any typed
//! address before it becomes the session account, on first connection and
//! on every account switch.

use std::sync::Arc;

use pc_01_identifier_sanitizer::{IdentifierSanitizer, IdentifierSanitizerApi};
use shared_types::{
    Address, IdentityProvider, Ledger, LedgerError, LedgerFault, SessionContext,
};
use tracing::info;

async fn active_account(identity: &dyn IdentityProvider) -> Result<Address, LedgerError> {
    let raw = identity.request_account().await.map_err(|fault| match fault {
        LedgerFault::Transport(msg) => LedgerError::LedgerUnreachable(msg),
        LedgerFault::Malformed(msg) => LedgerError::InvalidAddress(msg),
        LedgerFault::Reverted { reason } | LedgerFault::Rejected(reason) => {
            LedgerError::OperationFailed(reason)
        }
    })?;
    IdentifierSanitizer.sanitize_address(&raw)
}

/// Build a session for the identity provider's active account.
pub async fn connect(
    identity: &dyn IdentityProvider,
    ledger: Arc<dyn Ledger>,
) -> Result<SessionContext, LedgerError> {
    let account = active_account(identity).await?;
    info!(account = %account, "[pc-runtime] Session connected");
    Ok(SessionContext::new(account, ledger))
}

/// Re-read the active account after a wallet account switch.
pub async fn reconnect(
    session: &SessionContext,
    identity: &dyn IdentityProvider,
) -> Result<SessionContext, LedgerError> {
    let account = active_account(identity).await?;
    if account != session.account() {
        info!(
            from = %session.account(),
            to = %account,
            "[pc-runtime] Session account switched"
        );
    }
    Ok(session.with_account(account))
}
