//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{LedgerError, ProductId};

use crate::domain::payload::Payload;

/// Primary QR Identifier Codec API
#[async_trait]
pub trait QrCodecApi: Send + Sync {
    /// Payload for a product label: exactly the decimal id.
    fn encode(&self, id: ProductId) -> Payload;

    /// Best-effort text extraction from a payload already read by a scanner.
    fn decode(&self, payload: &[u8]) -> String;

    /// One-shot decode of an uploaded image.
    ///
    /// Fails with `DecodeFailed` when no symbol of an accepted symbology is
    /// found.
    async fn decode_upload(&self, image: &[u8]) -> Result<String, LedgerError>;
}
