//! Inbound Ports (Driving Ports / API)

use shared_types::{Address, LedgerError, ProductId};

/// Primary Identifier Sanitizer API
///
/// Both operations are pure; implementations may only add observability.
pub trait IdentifierSanitizerApi: Send + Sync {
    /// Canonical product id from free text, or `InvalidId`.
    fn sanitize_product_id(&self, raw: &str) -> Result<ProductId, LedgerError>;

    /// Canonical ledger address from free text, or `InvalidAddress`.
    fn sanitize_address(&self, raw: &str) -> Result<Address, LedgerError>;
}
