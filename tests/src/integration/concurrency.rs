//! # Concurrency
//!
//! Raters racing each other, passes overlapping, and averages that must
//! come out exact no matter how the ratings interleave.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE, BOB, CAROL};
    use futures::future::join_all;
    use pr_01_metadata_store::MetadataStoreApi;
    use pr_04_card_reconciliation::{
        CardReconciliationApi, RatingOutcome, StatsState, SubmitReviewData,
    };
    use proptest::prelude::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_raters_are_all_counted() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, card_id) = alice.create("Parallel votes").await;

        let mut raters = Vec::new();
        for (account, stars) in [(ALICE, 1), (BOB, 4), (CAROL, 4)] {
            let client = deployment.ready_client(account).await;
            assert!(client.orchestrator.select_card(&doc_id).await);
            raters.push((client, stars));
        }

        let handles = raters.iter().map(|(client, stars)| {
            let orchestrator = Arc::clone(&client.orchestrator);
            let data = SubmitReviewData::new(*stars).unwrap();
            tokio::spawn(async move { orchestrator.submit_rating(data).await })
        });
        for outcome in join_all(handles).await {
            assert_eq!(outcome.unwrap(), RatingOutcome::Submitted);
        }

        assert_eq!(
            alice.orchestrator.store().get_rating_count(card_id).await.unwrap(),
            3
        );
        alice.settle().await;
        let card = alice.orchestrator.card(&doc_id).unwrap();
        assert_eq!(card.total_reviews, 3);
        assert_eq!(card.average_rating(), 3.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_passes_settle_on_one_list() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        for title in ["One", "Two", "Three"] {
            deployment.clock.advance(1_000);
            alice.create(title).await;
        }

        let passes = (0..8).map(|_| {
            let orchestrator = Arc::clone(&alice.orchestrator);
            tokio::spawn(async move { orchestrator.reconcile().await })
        });
        for pass in join_all(passes).await {
            pass.unwrap().unwrap().wait().await;
        }

        let cards = alice.orchestrator.visible_cards();
        assert_eq!(cards.len(), 3);
        let generation = cards[0].generation;
        assert!(cards.iter().all(|c| c.generation == generation));
        assert!(!alice.orchestrator.is_loading());
        assert!(cards
            .iter()
            .all(|c| matches!(c.stats, StatsState::StatsReady(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_average_matches_submitted_ratings(stars in prop::collection::vec(1u8..=5, 1..4)) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let (average, reviews) = runtime.block_on(async {
                let deployment = Deployment::new();
                let alice = deployment.ready_client(ALICE).await;
                let (doc_id, _) = alice.create("Property").await;

                for (rater, star) in [ALICE, BOB, CAROL].iter().zip(&stars) {
                    let client = deployment.ready_client(rater).await;
                    client.orchestrator.select_card(&doc_id).await;
                    client
                        .orchestrator
                        .submit_rating(SubmitReviewData::new(*star).unwrap())
                        .await;
                }

                alice.settle().await;
                let card = alice.orchestrator.card(&doc_id).unwrap();
                (card.average_rating(), card.total_reviews)
            });

            let sum: u64 = stars.iter().map(|s| u64::from(*s)).sum();
            prop_assert_eq!(reviews, stars.len() as u64);
            prop_assert!((average - sum as f64 / stars.len() as f64).abs() < 1e-9);
        }
    }
}
