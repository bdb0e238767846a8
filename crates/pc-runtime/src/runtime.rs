//! Runtime facade over the subsystems.

use std::future::Future;
use std::sync::Arc;

use pc_01_identifier_sanitizer::{IdentifierSanitizer, IdentifierSanitizerApi};
use pc_02_qr_codec::{
    CaptureHandle, CaptureOutcome, FrameSource, ImageDecoder, Payload, QrCodecApi,
    QrCodecService,
};
use pc_03_ledger_submitter::{LedgerSubmitter, LedgerSubmitterApi};
use pc_04_ledger_query::{LedgerQueryAggregator, LedgerQueryApi};
use provenance_telemetry::{
    HistogramTimer, CONFIRMATIONS, CONFIRMATION_DURATION, FAILURES, QR_DECODES, QUERIES,
    SUBMISSIONS,
};
use serde::Serialize;
use shared_types::{LedgerError, ProductId, ProductView, Receipt, SessionContext, Stage};
use tracing::{debug, info};

use crate::config::RuntimeConfig;

/// Outcome of a confirmed registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: ProductId,
    pub receipt: Receipt,
    /// Scannable payload for the new product.
    pub qr_payload: String,
}

/// Entry point for front ends.
///
/// Every operation takes raw user input and the caller's session. Input is
/// sanitized before any ledger round-trip, and nothing is cached between
/// calls.
pub struct ProvenanceRuntime {
    sanitizer: IdentifierSanitizer,
    codec: QrCodecService,
    submitter: LedgerSubmitter,
    query: LedgerQueryAggregator,
}

impl ProvenanceRuntime {
    pub fn new(config: &RuntimeConfig, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            sanitizer: IdentifierSanitizer,
            codec: QrCodecService::with_config(decoder, config.scanner.clone()),
            submitter: LedgerSubmitter::with_config(config.submitter.clone()),
            query: LedgerQueryAggregator::with_config(config.query.clone()),
        }
    }

    fn reject(method: &'static str, e: LedgerError) -> LedgerError {
        FAILURES.with_label_values(&[method, e.category()]).inc();
        debug!(method, error = %e, "[pc-runtime] Input rejected");
        e
    }

    async fn metered<F>(method: &'static str, operation: F) -> Result<Receipt, LedgerError>
    where
        F: Future<Output = Result<Receipt, LedgerError>>,
    {
        SUBMISSIONS.with_label_values(&[method]).inc();
        let timer = HistogramTimer::new(&CONFIRMATION_DURATION);
        let result = operation.await;
        drop(timer);

        match &result {
            Ok(_) => CONFIRMATIONS.with_label_values(&[method]).inc(),
            Err(e) => FAILURES.with_label_values(&[method, e.category()]).inc(),
        }
        result
    }

    /// QR payload for a product id typed by the user.
    pub fn qr_payload(&self, raw_id: &str) -> Result<Payload, LedgerError> {
        let id = self.sanitizer.sanitize_product_id(raw_id)?;
        Ok(self.codec.encode(id))
    }

    /// Register a product and return its QR payload.
    pub async fn register(
        &self,
        session: &SessionContext,
        raw_id: &str,
        description: &str,
        location: &str,
    ) -> Result<Registration, LedgerError> {
        const METHOD: &str = "addProduct";
        let id = self
            .sanitizer
            .sanitize_product_id(raw_id)
            .map_err(|e| Self::reject(METHOD, e))?;

        let receipt = Self::metered(
            METHOD,
            self.submitter
                .register_product(session, id, description, location),
        )
        .await?;

        info!(product_id = %id, "[pc-runtime] Product registered");
        Ok(Registration {
            id,
            receipt,
            qr_payload: self.codec.encode(id).into_string(),
        })
    }

    /// Record the next lifecycle stage.
    pub async fn advance(
        &self,
        session: &SessionContext,
        raw_id: &str,
        stage: Stage,
        location: &str,
        action: &str,
    ) -> Result<Receipt, LedgerError> {
        const METHOD: &str = "updateStage";
        let id = self
            .sanitizer
            .sanitize_product_id(raw_id)
            .map_err(|e| Self::reject(METHOD, e))?;

        Self::metered(
            METHOD,
            self.submitter
                .advance_stage(session, id, stage, location, action),
        )
        .await
    }

    /// Hand the product to another account.
    ///
    /// Both the id and the new owner are sanitized before the ledger is
    /// contacted.
    pub async fn transfer(
        &self,
        session: &SessionContext,
        raw_id: &str,
        raw_new_owner: &str,
    ) -> Result<Receipt, LedgerError> {
        const METHOD: &str = "transferOwnership";
        let id = self
            .sanitizer
            .sanitize_product_id(raw_id)
            .map_err(|e| Self::reject(METHOD, e))?;
        let new_owner = self
            .sanitizer
            .sanitize_address(raw_new_owner)
            .map_err(|e| Self::reject(METHOD, e))?;

        Self::metered(
            METHOD,
            self.submitter.transfer_ownership(session, id, new_owner),
        )
        .await
    }

    /// Product view for an id typed by the user.
    pub async fn track(
        &self,
        session: &SessionContext,
        raw_id: &str,
    ) -> Result<ProductView, LedgerError> {
        let result = match self.sanitizer.sanitize_product_id(raw_id) {
            Ok(id) => self.query.fetch_product_view(session, id).await,
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.category(),
        };
        QUERIES.with_label_values(&[outcome]).inc();
        result
    }

    /// Product view for a scanned payload (raw symbol bytes).
    ///
    /// A payload with no text left after trimming yields `DecodeFailed`.
    pub async fn track_payload(
        &self,
        session: &SessionContext,
        payload: &[u8],
    ) -> Result<ProductView, LedgerError> {
        let text = self.codec.decode(payload);
        if text.is_empty() {
            let e = LedgerError::DecodeFailed("empty payload".to_string());
            QR_DECODES
                .with_label_values(&["payload", e.category()])
                .inc();
            return Err(e);
        }
        QR_DECODES.with_label_values(&["payload", "ok"]).inc();
        self.track(session, &text).await
    }

    /// Product view for an uploaded image.
    pub async fn track_upload(
        &self,
        session: &SessionContext,
        image: &[u8],
    ) -> Result<ProductView, LedgerError> {
        let text = match self.codec.decode_upload(image).await {
            Ok(text) => {
                QR_DECODES.with_label_values(&["upload", "ok"]).inc();
                text
            }
            Err(e) => {
                QR_DECODES
                    .with_label_values(&["upload", e.category()])
                    .inc();
                return Err(e);
            }
        };
        self.track(session, &text).await
    }

    /// Start scanning a camera stream. Pass the handle to
    /// [`track_scanned`](Self::track_scanned), or drop it to tear the
    /// session down.
    pub fn start_capture<S>(&self, source: S) -> CaptureHandle
    where
        S: FrameSource + 'static,
    {
        self.codec.start_capture(source)
    }

    /// Wait for the capture session's first decode and track that product.
    ///
    /// A session that ends without a payload yields `DecodeFailed`.
    pub async fn track_scanned(
        &self,
        session: &SessionContext,
        capture: CaptureHandle,
    ) -> Result<ProductView, LedgerError> {
        let text = match capture.outcome().await {
            CaptureOutcome::Decoded(text) => {
                QR_DECODES.with_label_values(&["capture", "ok"]).inc();
                text
            }
            other => {
                let e = LedgerError::DecodeFailed(format!(
                    "capture ended without a payload ({other:?})"
                ));
                QR_DECODES
                    .with_label_values(&["capture", e.category()])
                    .inc();
                return Err(e);
            }
        };
        self.track(session, &text).await
    }
}
