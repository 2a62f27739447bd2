//! # Inbound Ports
//!
//! API trait defining what the Metadata Store subsystem can do.

use crate::domain::{MetadataStoreError, NewCardRecord, RatingRecord, RawCardRecord};
use async_trait::async_trait;
use shared_types::{Address, OnChainCardId};

/// Metadata store API - inbound port.
#[async_trait]
pub trait MetadataStoreApi: Send + Sync {
    /// Insert a card with an empty on-chain id; returns the generated record key.
    async fn create_card_record(&self, record: NewCardRecord)
        -> Result<String, MetadataStoreError>;

    /// Write a card under a caller-chosen key, replacing any existing document.
    async fn put_card_record(
        &self,
        record_id: &str,
        record: NewCardRecord,
        on_chain_id: Option<OnChainCardId>,
    ) -> Result<(), MetadataStoreError>;

    /// Set the on-chain id once the creation transaction is known.
    async fn backfill_on_chain_id(
        &self,
        record_id: &str,
        on_chain_id: OnChainCardId,
    ) -> Result<(), MetadataStoreError>;

    /// Fetch one card record.
    async fn get_card_record(
        &self,
        record_id: &str,
    ) -> Result<Option<RawCardRecord>, MetadataStoreError>;

    /// Unfiltered snapshot of every card record.
    async fn list_all_card_records(&self) -> Result<Vec<RawCardRecord>, MetadataStoreError>;

    /// Upsert the vote record and bump the card's review counter.
    async fn record_rating(&self, rating: &RatingRecord) -> Result<(), MetadataStoreError>;

    /// Fetch one user's vote on a card.
    async fn get_rating(
        &self,
        card_id: OnChainCardId,
        user_id: &Address,
    ) -> Result<Option<RatingRecord>, MetadataStoreError>;

    /// Every vote stored for a card.
    async fn list_ratings(
        &self,
        card_id: OnChainCardId,
    ) -> Result<Vec<RatingRecord>, MetadataStoreError>;

    /// Whether the user already voted on the card (UI gating only).
    async fn has_user_rated(
        &self,
        card_id: OnChainCardId,
        user_id: &Address,
    ) -> Result<bool, MetadataStoreError>;

    /// Review counter; zero when no counter document exists.
    async fn get_rating_count(&self, card_id: OnChainCardId) -> Result<u64, MetadataStoreError>;
}
