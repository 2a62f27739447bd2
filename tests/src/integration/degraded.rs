//! # Degraded Operation
//!
//! Relayer outages, node outages, store outages and malformed records. None
//! of them may take down the card list or leave half-written state.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE, BOB};
    use pr_01_metadata_store::{DocumentDatabase, DocumentPath};
    use pr_04_card_reconciliation::{
        CardReconciliationApi, DegradedReason, NoticeKind, OrchestratorError, RatingOutcome,
        ReviewStatus, StatsState, SubmitReviewData,
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_cards_recover_after_relayer_outage() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Coffee quality").await;
        let bob = deployment.ready_client(BOB).await;
        bob.orchestrator.select_card(&doc_id).await;
        bob.orchestrator
            .submit_rating(SubmitReviewData::new(5).unwrap())
            .await;

        deployment.runtime.set_relayer_offline(true);
        alice.settle().await;
        let card = alice.orchestrator.card(&doc_id).unwrap();
        assert_eq!(card.degraded_reason(), Some(DegradedReason::ServiceUnavailable));
        assert_eq!(card.total_reviews, 1);
        assert_eq!(card.formatted_average(), "Encrypted");

        deployment.runtime.set_relayer_offline(false);
        alice.settle().await;
        let card = alice.orchestrator.card(&doc_id).unwrap();
        assert!(!card.decryption_error());
        assert_eq!(card.formatted_average(), "5.0");
    }

    #[tokio::test]
    async fn test_rating_mined_but_not_recorded_stays_uncounted() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Coffee quality").await;
        let bob = deployment.ready_client(BOB).await;
        bob.orchestrator.select_card(&doc_id).await;

        deployment.db.set_read_only(true);
        let outcome = bob
            .orchestrator
            .submit_rating(SubmitReviewData::new(4).unwrap())
            .await;
        assert!(matches!(outcome, RatingOutcome::Failed(_)));
        assert!(!bob.orchestrator.has_voted());
        deployment.db.set_read_only(false);

        // Every client sees the on-chain average without a review count.
        alice.settle().await;
        let card = alice.orchestrator.card(&doc_id).unwrap();
        assert_eq!(card.total_reviews, 0);
        assert_eq!(card.formatted_average(), "4.0");

        // The store never recorded Bob's vote.
        bob.orchestrator.select_card(&doc_id).await;
        assert!(!bob.orchestrator.has_voted());
    }

    #[tokio::test]
    async fn test_relayer_rejection_is_not_an_outage() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Coffee quality").await;

        deployment.runtime.set_relayer_rejects(true);
        alice.settle().await;
        let card = alice.orchestrator.card(&doc_id).unwrap();
        assert_eq!(card.stats, StatsState::StatsDegraded(DegradedReason::Failed));
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped_by_every_client() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        alice.create("Valid card").await;

        let broken = [
            ("no-title", json!({ "createdAt": 1, "creator": ALICE })),
            ("blank-title", json!({ "title": "  ", "createdAt": 1 })),
            ("no-timestamp", json!({ "title": "Lost" })),
        ];
        for (id, doc) in broken {
            deployment
                .db
                .set(
                    &DocumentPath::card(id).unwrap(),
                    doc.as_object().cloned().unwrap(),
                )
                .await
                .unwrap();
        }

        let bob = deployment.ready_client(BOB).await;
        let titles: Vec<String> = bob
            .orchestrator
            .visible_cards()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Valid card"]);
    }

    #[tokio::test]
    async fn test_node_outage_during_rating_writes_nothing() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, card_id) = alice.create("Coffee quality").await;
        let bob = deployment.ready_client(BOB).await;
        bob.orchestrator.select_card(&doc_id).await;
        bob.orchestrator.take_notices();

        deployment.contract.set_offline(true);
        let writes = deployment.db.write_count();
        let outcome = bob
            .orchestrator
            .submit_rating(SubmitReviewData::new(4).unwrap())
            .await;

        let RatingOutcome::Failed(message) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(message, "Error submitting rating: RPC error: node unreachable");
        assert_eq!(deployment.db.write_count(), writes);
        assert!(deployment
            .db
            .snapshot(&format!("reviewCounts/{}", card_id))
            .is_none());
        assert_eq!(bob.orchestrator.review_status(), ReviewStatus::Idle);
        assert!(!bob.orchestrator.has_voted());
        let notices = bob.orchestrator.take_notices();
        assert_eq!(notices.last().map(|n| n.kind.clone()), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn test_store_outage_keeps_the_last_list() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        alice.create("Coffee quality").await;
        alice.settle().await;

        deployment.db.set_offline(true);
        let result = alice.orchestrator.reconcile().await;
        assert!(matches!(result, Err(OrchestratorError::Store(_))));
        assert_eq!(alice.orchestrator.visible_cards().len(), 1);
        assert!(!alice.orchestrator.is_loading());

        deployment.db.set_offline(false);
        alice.settle().await;
        assert_eq!(alice.orchestrator.visible_cards().len(), 1);
    }

    #[tokio::test]
    async fn test_uninitialized_gateway_still_lists_cards() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Coffee quality").await;

        deployment.runtime.set_load_fails(true);
        let bob = deployment.client(BOB);
        bob.orchestrator.initialize().await.unwrap().wait().await;

        let snapshot = bob.orchestrator.snapshot();
        assert!(!snapshot.gateway_ready);
        assert_eq!(snapshot.cards.len(), 1);
        let card = bob.orchestrator.card(&doc_id).unwrap();
        assert_eq!(card.degraded_reason(), Some(DegradedReason::Failed));
    }
}
