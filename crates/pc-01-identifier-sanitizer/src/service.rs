//! Identifier Sanitizer Service
//!
//! Implements `IdentifierSanitizerApi` on top of the domain rules and records
//! rejected input at debug level.

use shared_types::{Address, LedgerError, ProductId};
use tracing::debug;

use crate::domain;
use crate::ports::inbound::IdentifierSanitizerApi;

/// Stateless sanitizer service.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierSanitizer;

impl IdentifierSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierSanitizerApi for IdentifierSanitizer {
    fn sanitize_product_id(&self, raw: &str) -> Result<ProductId, LedgerError> {
        domain::sanitize_product_id(raw).inspect_err(|e| {
            debug!(error = %e, "[pc-01] Rejected product id input");
        })
    }

    fn sanitize_address(&self, raw: &str) -> Result<Address, LedgerError> {
        domain::sanitize_address(raw).inspect_err(|e| {
            debug!(error = %e, "[pc-01] Rejected address input");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_delegates_to_domain() {
        let sanitizer = IdentifierSanitizer::new();

        assert_eq!(
            sanitizer.sanitize_product_id("PID-1001").unwrap().to_string(),
            "1001"
        );
        assert!(sanitizer.sanitize_address("not-an-address").is_err());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let api: Box<dyn IdentifierSanitizerApi> = Box::new(IdentifierSanitizer::new());
        let address = api
            .sanitize_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359")
            .unwrap();
        assert_eq!(
            address.to_string(),
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );
    }
}
