//! # End-to-End Flows
//!
//! Two or more clients against one deployment:
//!
//! 1. **Create**: card written to the store, mined, id backfilled
//! 2. **Rate**: rating encrypted for the rater, summed on-chain, vote recorded
//! 3. **Decrypt**: every client sees the same average after its next pass

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE, BOB, CAROL};
    use pr_01_metadata_store::MetadataStoreApi;
    use pr_02_chain_client::ChainClientApi;
    use pr_04_card_reconciliation::{
        CardReconciliationApi, CreateCardData, CreateOutcome, NoticeKind, RatingOutcome,
        StatsState, SubmitReviewData,
    };
    use shared_types::{Address, OnChainCardId};

    async fn rate(client: &crate::fixtures::Client, doc_id: &str, stars: u8) -> RatingOutcome {
        assert!(client.orchestrator.select_card(doc_id).await);
        client
            .orchestrator
            .submit_rating(SubmitReviewData::new(stars).unwrap())
            .await
    }

    #[tokio::test]
    async fn test_card_created_by_one_client_is_rated_by_others() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let bob = deployment.ready_client(BOB).await;
        let carol = deployment.ready_client(CAROL).await;

        let (doc_id, card_id) = alice.create("Team offsite").await;
        assert_eq!(card_id, OnChainCardId(1));

        bob.settle().await;
        carol.settle().await;
        let seen = bob.orchestrator.card(&doc_id).unwrap();
        assert_eq!(seen.id, Some(card_id));
        assert_eq!(seen.formatted_average(), "No ratings yet");

        assert_eq!(rate(&bob, &doc_id, 5).await, RatingOutcome::Submitted);
        assert_eq!(rate(&carol, &doc_id, 3).await, RatingOutcome::Submitted);

        for client in [&alice, &bob, &carol] {
            client.settle().await;
            let card = client.orchestrator.card(&doc_id).unwrap();
            assert_eq!(card.total_reviews, 2);
            assert_eq!(card.average_rating(), 4.0);
            assert_eq!(card.formatted_average(), "4.0");
        }

        let votes = alice.orchestrator.store().list_ratings(card_id).await.unwrap();
        let mut voters: Vec<String> = votes.iter().map(|v| v.user_id.to_string()).collect();
        voters.sort();
        let mut expected = vec![BOB.to_string(), CAROL.to_string()];
        expected.sort();
        assert_eq!(voters, expected);
    }

    #[tokio::test]
    async fn test_ratings_are_encrypted_for_the_rater() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let bob = deployment.ready_client(BOB).await;
        let (doc_id, _) = alice.create("Coffee quality").await;
        bob.settle().await;

        rate(&bob, &doc_id, 2).await;

        let encryptions = deployment.runtime.encryptions();
        assert_eq!(encryptions.len(), 1);
        assert_eq!(encryptions[0].values, vec![2]);
        assert_eq!(encryptions[0].user.as_str(), BOB);
        assert_eq!(encryptions[0].contract.as_str(), crate::fixtures::CONTRACT);
    }

    #[tokio::test]
    async fn test_creation_fee_is_paid_from_the_creator() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        assert_eq!(
            alice.orchestrator.refresh_balance().await.as_deref(),
            Some("5.0")
        );

        deployment.contract.set_fee(crate::fixtures::ether("0.2"));
        assert_eq!(
            alice.orchestrator.refresh_creation_fee().await.as_deref(),
            Some("0.2")
        );
        alice.create("Lunch options").await;

        assert_eq!(
            alice
                .orchestrator
                .chain()
                .read_balance(&Address::new(ALICE))
                .await
                .as_deref(),
            Some("4.8")
        );
    }

    #[tokio::test]
    async fn test_vote_is_remembered_across_sessions() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Standup length").await;

        let bob = deployment.ready_client(BOB).await;
        rate(&bob, &doc_id, 4).await;
        assert!(bob.orchestrator.has_voted());

        let bob_again = deployment.ready_client(BOB).await;
        assert!(bob_again.orchestrator.select_card(&doc_id).await);
        assert!(bob_again.orchestrator.has_voted());

        let carol = deployment.ready_client(CAROL).await;
        assert!(carol.orchestrator.select_card(&doc_id).await);
        assert!(!carol.orchestrator.has_voted());
    }

    #[tokio::test]
    async fn test_unconfirmed_card_is_listed_but_not_decrypted() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        deployment.contract.set_suppress_events(true);

        let outcome = alice
            .orchestrator
            .create_card(CreateCardData::new("Orphan", None).unwrap())
            .await;
        let CreateOutcome::EventNotFound { doc_id } = outcome else {
            panic!("expected a missing event, got {:?}", outcome);
        };
        let kinds: Vec<NoticeKind> = alice
            .orchestrator
            .take_notices()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(kinds.last(), Some(&NoticeKind::EventNotFound));

        let bob = deployment.ready_client(BOB).await;
        let card = bob.orchestrator.card(&doc_id).unwrap();
        assert!(card.is_pending());
        assert_eq!(card.stats, StatsState::Listed);

        // Selecting it works, rating it is a no-op.
        assert!(bob.orchestrator.select_card(&doc_id).await);
        assert_eq!(
            bob.orchestrator
                .submit_rating(SubmitReviewData::new(5).unwrap())
                .await,
            RatingOutcome::Skipped
        );
        assert!(deployment.runtime.encryptions().is_empty());
    }

    #[tokio::test]
    async fn test_newest_cards_come_first() {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        for title in ["First", "Second", "Third"] {
            deployment.clock.advance(60_000);
            alice.create(title).await;
        }
        alice.settle().await;
        let titles: Vec<String> = alice
            .orchestrator
            .visible_cards()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
        assert_eq!(alice.orchestrator.search("SEC").len(), 1);
    }
}
