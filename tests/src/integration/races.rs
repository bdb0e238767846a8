//! # Concurrent Operations
//!
//! Operations on the same product are not coordinated client side; the
//! ledger's ordering decides and the loser surfaces the ledger's rejection.
//! Operations on different products overlap freely.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pc_03_ledger_submitter::{classify_fault, LedgerSubmitter, LedgerSubmitterApi};
    use pc_04_ledger_query::{LedgerQueryAggregator, LedgerQueryApi};
    use shared_types::{Address, LedgerCall, LedgerError, LedgerMutation, ProductId, Stage};

    use crate::integration::fixtures::{harness, DISTRIBUTOR};

    fn id(n: u64) -> ProductId {
        ProductId::from_u64(n).unwrap()
    }

    #[tokio::test]
    async fn test_racing_registrations_one_wins() {
        let h = harness().await;

        let (first, second) = tokio::join!(
            h.runtime.register(&h.session, "500", "Widget", "Mumbai"),
            h.runtime.register(&h.session, "500", "Gadget", "Delhi"),
        );

        let outcomes = [first.is_ok(), second.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        let loser = if first.is_err() { first } else { second };
        assert!(matches!(loser, Err(LedgerError::DuplicateId { .. })));
        assert_eq!(h.ledger.product_count(), 1);
    }

    #[tokio::test]
    async fn test_pending_registration_loses_at_finality() {
        let h = harness().await;
        let call = |description: &str| LedgerCall::AddProduct {
            id: id(600),
            description: description.to_string(),
            location: "Mumbai".to_string(),
        };

        // Both pass the dry run before either is mined.
        let account = h.session.account();
        let first = h.ledger.submit(account, call("Widget")).await.unwrap();
        let second = h.ledger.submit(account, call("Gadget")).await.unwrap();
        first.await_finality().await.unwrap();
        let fault = second.await_finality().await.unwrap_err();

        assert_eq!(
            classify_fault(fault, id(600)),
            LedgerError::DuplicateId { id: id(600) }
        );
    }

    #[tokio::test]
    async fn test_stale_owner_surfaces_rejection() {
        let h = harness().await;
        h.runtime
            .register(&h.session, "700", "Widget", "Mumbai")
            .await
            .unwrap();

        let (transfer, advance) = tokio::join!(
            h.runtime.transfer(&h.session, "700", DISTRIBUTOR),
            h.runtime
                .advance(&h.session, "700", Stage::InProduction, "Pune", "Assembly"),
        );

        // Whichever lands second sees the state the first left behind.
        assert!(transfer.is_ok());
        match advance {
            Ok(_) => {}
            Err(e) => assert!(matches!(e, LedgerError::OperationFailed(_))),
        }

        let view = h.runtime.track(&h.session, "700").await.unwrap();
        assert_eq!(view.product.current_owner, Address::parse(DISTRIBUTOR).unwrap());
    }

    #[tokio::test]
    async fn test_independent_products_overlap() {
        let h = harness().await;
        let submitter = Arc::new(LedgerSubmitter::new());

        let mut tasks = Vec::new();
        for n in 1..=8u64 {
            let submitter = Arc::clone(&submitter);
            let session = h.session.clone();
            tasks.push(tokio::spawn(async move {
                submitter
                    .register_product(&session, id(n), "Widget", "Mumbai")
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.ledger.product_count(), 8);
        let query = LedgerQueryAggregator::new();
        for n in 1..=8u64 {
            let view = query.fetch_product_view(&h.session, id(n)).await.unwrap();
            assert_eq!(view.timeline.len(), 1);
        }
    }
}
