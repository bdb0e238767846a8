//! QR Identifier Codec Service
//!
//! Main service implementing `QrCodecApi`, plus the capture-stream loop.

mod capture;

pub use capture::{CaptureHandle, CaptureOutcome};

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{LedgerError, ProductId};
use tracing::{debug, info};

use crate::config::ScannerConfig;
use crate::domain::payload::{self, Payload};
use crate::ports::inbound::QrCodecApi;
use crate::ports::outbound::{FrameSource, ImageDecoder};

/// QR codec service
///
/// Encoding and text extraction are pure; decoding images is delegated to
/// the injected `ImageDecoder`.
pub struct QrCodecService {
    decoder: Arc<dyn ImageDecoder>,
    config: ScannerConfig,
}

impl QrCodecService {
    /// Create a new service with default config
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self::with_config(decoder, ScannerConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(decoder: Arc<dyn ImageDecoder>, config: ScannerConfig) -> Self {
        Self { decoder, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Start scanning a camera stream in a background task.
    ///
    /// The first frame that decodes to non-empty text ends the session.
    /// Dropping the returned handle tears the session down.
    pub fn start_capture<S>(&self, source: S) -> CaptureHandle
    where
        S: FrameSource + 'static,
    {
        info!(
            max_fps = self.config.max_fps,
            "[pc-02] Starting capture session"
        );
        CaptureHandle::spawn(
            source,
            Arc::clone(&self.decoder),
            self.config.capture_symbologies.clone(),
            self.config.frame_interval(),
        )
    }
}

#[async_trait]
impl QrCodecApi for QrCodecService {
    fn encode(&self, id: ProductId) -> Payload {
        payload::encode(id)
    }

    fn decode(&self, payload: &[u8]) -> String {
        payload::decode(payload)
    }

    async fn decode_upload(&self, image: &[u8]) -> Result<String, LedgerError> {
        let accepted = &self.config.upload_symbologies;

        let symbol = self
            .decoder
            .decode_image(image, accepted)
            .await
            .map_err(|e| LedgerError::DecodeFailed(e.to_string()))?;

        if !accepted.contains(&symbol.symbology) {
            return Err(LedgerError::DecodeFailed(format!(
                "unexpected symbology {:?}",
                symbol.symbology
            )));
        }

        let text = payload::decode(&symbol.bytes);
        if text.is_empty() {
            return Err(LedgerError::DecodeFailed("empty payload".to_string()));
        }

        debug!(bytes = image.len(), "[pc-02] Decoded uploaded image");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::symbology::Symbology;
    use crate::ports::outbound::mocks::EchoDecoder;
    use crate::ports::outbound::{DecodeError, DecodedSymbol};

    fn service() -> QrCodecService {
        QrCodecService::new(Arc::new(EchoDecoder))
    }

    #[tokio::test]
    async fn test_upload_decodes_to_raw_text() {
        let text = service().decode_upload(b" 1001\n").await.unwrap();
        assert_eq!(text, "1001");
    }

    #[tokio::test]
    async fn test_upload_failure_is_decode_failed() {
        let result = service().decode_upload(b"!blurry").await;
        assert!(matches!(result, Err(LedgerError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_upload_empty_payload_is_decode_failed() {
        let result = service().decode_upload(b"   ").await;
        assert!(matches!(result, Err(LedgerError::DecodeFailed(_))));
    }

    struct WrongSymbology;

    #[async_trait]
    impl ImageDecoder for WrongSymbology {
        async fn decode_image(
            &self,
            image: &[u8],
            _symbologies: &[Symbology],
        ) -> Result<DecodedSymbol, DecodeError> {
            Ok(DecodedSymbol {
                symbology: Symbology::Code128,
                bytes: image.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_upload_is_restricted_to_qr() {
        let service = QrCodecService::new(Arc::new(WrongSymbology));
        let result = service.decode_upload(b"1001").await;
        assert!(matches!(result, Err(LedgerError::DecodeFailed(_))));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let service = service();
        let id = ProductId::from_u64(1001).unwrap();
        assert_eq!(service.decode(service.encode(id).as_bytes()), "1001");
    }
}
