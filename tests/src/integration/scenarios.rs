//! # Lifecycle Scenarios
//!
//! End-to-end flows from raw user input to the render-ready view:
//!
//! 1. Registration, duplicate registration
//! 2. Stage advance on a registered and an unregistered product
//! 3. Ownership transfer, valid and malformed recipients
//! 4. Tracking by typed id, scanned payload and uploaded image

#[cfg(test)]
mod tests {
    use pc_02_qr_codec::ReplayFrames;
    use pc_runtime::reconnect;
    use shared_types::{Address, LedgerError, ProductId, Stage};

    use crate::integration::fixtures::{harness, DISTRIBUTOR, MANUFACTURER};

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    #[tokio::test]
    async fn test_register_once_then_duplicate() {
        let h = harness().await;

        let registration = h
            .runtime
            .register(&h.session, "1001", "Widget", "Mumbai")
            .await
            .unwrap();
        assert_eq!(registration.id, ProductId::from_u64(1001).unwrap());
        assert_eq!(registration.receipt.block_number, 1);

        let result = h
            .runtime
            .register(&h.session, "1001", "Widget", "Mumbai")
            .await;
        assert!(matches!(result, Err(LedgerError::DuplicateId { .. })));
        assert_eq!(h.ledger.product_count(), 1);
        assert_eq!(h.ledger.block_number(), 1);
    }

    #[tokio::test]
    async fn test_register_with_messy_id_and_blank_field() {
        let h = harness().await;

        let registration = h
            .runtime
            .register(&h.session, "PRD-00042 ", "Widget", "Mumbai")
            .await
            .unwrap();
        assert_eq!(registration.qr_payload, "42");

        let result = h.runtime.register(&h.session, "43", "   ", "Mumbai").await;
        assert!(matches!(result, Err(LedgerError::MissingField(_))));
        assert_eq!(h.ledger.product_count(), 1);
    }

    // =========================================================================
    // STAGE ADVANCE
    // =========================================================================

    #[tokio::test]
    async fn test_advance_unregistered_is_not_found() {
        let h = harness().await;

        let result = h
            .runtime
            .advance(&h.session, "9999", Stage::InProduction, "Pune", "Assembly")
            .await;
        assert!(matches!(result, Err(LedgerError::ProductNotFound { .. })));
        assert_eq!(h.ledger.block_number(), 0);
    }

    #[tokio::test]
    async fn test_view_after_register_and_advance() {
        let h = harness().await;
        h.runtime
            .register(&h.session, "1001", "Widget", "Mumbai")
            .await
            .unwrap();
        h.runtime
            .advance(&h.session, "1001", Stage::InProduction, "Pune", "Assembly")
            .await
            .unwrap();

        let view = h.runtime.track(&h.session, "1001").await.unwrap();
        assert_eq!(view.product.current_stage, Stage::InProduction);
        assert_eq!(view.product.location, "Pune");

        let stages: Vec<Stage> = view.timeline.iter().map(|e| e.record.stage).collect();
        assert_eq!(stages, vec![Stage::Created, Stage::InProduction]);
        assert!(view.timeline.entries()[0].record.timestamp < view.timeline.entries()[1].record.timestamp);
    }

    // =========================================================================
    // OWNERSHIP
    // =========================================================================

    #[tokio::test]
    async fn test_transfer_to_valid_and_malformed_address() {
        let h = harness().await;
        h.runtime
            .register(&h.session, "1001", "Widget", "Mumbai")
            .await
            .unwrap();

        let result = h
            .runtime
            .transfer(&h.session, "1001", "not-an-address")
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidAddress(_))));
        assert_eq!(h.ledger.block_number(), 1);

        h.runtime
            .transfer(&h.session, "1001", DISTRIBUTOR)
            .await
            .unwrap();
        let view = h.runtime.track(&h.session, "1001").await.unwrap();
        assert_eq!(view.product.current_owner, Address::parse(DISTRIBUTOR).unwrap());
    }

    #[tokio::test]
    async fn test_previous_owner_is_rejected_after_transfer() {
        let h = harness().await;
        h.runtime
            .register(&h.session, "5", "Widget", "Mumbai")
            .await
            .unwrap();
        h.runtime
            .transfer(&h.session, "5", DISTRIBUTOR)
            .await
            .unwrap();

        let result = h
            .runtime
            .advance(&h.session, "5", Stage::InTransit, "Sea", "Shipped")
            .await;
        assert!(matches!(result, Err(LedgerError::OperationFailed(_))));

        h.ledger.switch_account(DISTRIBUTOR);
        let session = reconnect(&h.session, &h.ledger).await.unwrap();
        h.runtime
            .advance(&session, "5", Stage::InTransit, "Sea", "Shipped")
            .await
            .unwrap();

        let view = h.runtime.track(&session, "5").await.unwrap();
        let owners: Vec<Address> = view.timeline.ownership_chain().collect();
        assert_eq!(
            owners,
            vec![
                Address::parse(MANUFACTURER).unwrap(),
                Address::parse(DISTRIBUTOR).unwrap()
            ]
        );
    }

    // =========================================================================
    // TRACKING
    // =========================================================================

    #[tokio::test]
    async fn test_scanned_payload_drives_query() {
        let h = harness().await;
        let registration = h
            .runtime
            .register(&h.session, "77", "Widget", "Mumbai")
            .await
            .unwrap();

        let frames = format!("\n\n{}\n", registration.qr_payload);
        let capture = h.runtime.start_capture(ReplayFrames::from_lines(&frames));
        let view = h.runtime.track_scanned(&h.session, capture).await.unwrap();
        assert_eq!(view.product.id, registration.id);

        let view = h
            .runtime
            .track_upload(&h.session, registration.qr_payload.as_bytes())
            .await
            .unwrap();
        assert_eq!(view.timeline.len(), 1);
    }

    #[tokio::test]
    async fn test_track_unknown_and_invalid_ids() {
        let h = harness().await;

        let result = h.runtime.track(&h.session, "12345").await;
        assert!(matches!(result, Err(LedgerError::ProductNotFound { .. })));

        let result = h.runtime.track(&h.session, "no digits").await;
        assert!(matches!(result, Err(LedgerError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let h = harness().await;
        h.runtime
            .register(&h.session, "1", "Widget", "Mumbai")
            .await
            .unwrap();
        for stage in &Stage::ALL[1..] {
            h.runtime
                .advance(&h.session, "1", *stage, "Somewhere", "Step")
                .await
                .unwrap();
        }

        let view = h.runtime.track(&h.session, "1").await.unwrap();
        assert_eq!(view.product.current_stage, Stage::Completed);
        assert_eq!(view.timeline.len(), Stage::ALL.len());
        assert_eq!(
            view.timeline.latest().map(|e| e.record.stage),
            Some(Stage::Completed)
        );
    }
}
