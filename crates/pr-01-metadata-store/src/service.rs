//! # Metadata Store Service
//!
//! Application service mapping card and rating records onto documents.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{
    to_document, CardDocument, CollectionPath, Document, DocumentPath, MetadataStoreError,
    NewCardRecord, RatingDocument, RatingRecord, RawCardRecord,
};
use crate::ports::{DocumentDatabase, MetadataStoreApi};
use shared_types::{Address, OnChainCardId};

/// Counter field in `reviewCounts/{cardId}`.
const COUNT_FIELD: &str = "count";

/// Metadata store client over any document database.
pub struct MetadataStoreClient<D: DocumentDatabase> {
    db: Arc<D>,
}

impl<D: DocumentDatabase> MetadataStoreClient<D> {
    /// Create a client over a shared database handle.
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    /// The underlying database.
    pub fn database(&self) -> &Arc<D> {
        &self.db
    }

    fn card_document(
        record: &NewCardRecord,
        on_chain_id: Option<OnChainCardId>,
    ) -> Result<Document, MetadataStoreError> {
        let mut doc = CardDocument::from(record);
        if let Some(id) = on_chain_id {
            doc.id = id.to_string();
        }
        to_document(&doc)
    }
}

impl<D: DocumentDatabase> Clone for MetadataStoreClient<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[async_trait]
impl<D: DocumentDatabase + 'static> MetadataStoreApi for MetadataStoreClient<D> {
    async fn create_card_record(
        &self,
        record: NewCardRecord,
    ) -> Result<String, MetadataStoreError> {
        let doc = Self::card_document(&record, None)?;
        let record_id = self.db.add(&CollectionPath::cards(), doc).await?;
        info!("[pr-01] Created card record {} ({:?})", record_id, record.title);
        Ok(record_id)
    }

    async fn put_card_record(
        &self,
        record_id: &str,
        record: NewCardRecord,
        on_chain_id: Option<OnChainCardId>,
    ) -> Result<(), MetadataStoreError> {
        let path = DocumentPath::card(record_id)?;
        let doc = Self::card_document(&record, on_chain_id)?;
        self.db.set(&path, doc).await
    }

    async fn backfill_on_chain_id(
        &self,
        record_id: &str,
        on_chain_id: OnChainCardId,
    ) -> Result<(), MetadataStoreError> {
        let path = DocumentPath::card(record_id)?;
        let mut fields = Document::new();
        fields.insert("id".to_string(), Value::String(on_chain_id.to_string()));
        self.db.update(&path, fields).await?;
        info!("[pr-01] Card record {} -> on-chain id {}", record_id, on_chain_id);
        Ok(())
    }

    async fn get_card_record(
        &self,
        record_id: &str,
    ) -> Result<Option<RawCardRecord>, MetadataStoreError> {
        let path = DocumentPath::card(record_id)?;
        Ok(self
            .db
            .get(&path)
            .await?
            .map(|doc| RawCardRecord::from_document(record_id, &doc)))
    }

    async fn list_all_card_records(&self) -> Result<Vec<RawCardRecord>, MetadataStoreError> {
        let docs = self.db.list(&CollectionPath::cards()).await?;
        debug!("[pr-01] Listed {} card records", docs.len());
        Ok(docs
            .iter()
            .map(|(key, doc)| RawCardRecord::from_document(key.clone(), doc))
            .collect())
    }

    async fn record_rating(&self, rating: &RatingRecord) -> Result<(), MetadataStoreError> {
        let path = DocumentPath::rating(rating.card_id, &rating.user_id)?;
        let doc = to_document(&RatingDocument::from(rating))?;
        self.db.set(&path, doc).await?;

        let count = self
            .db
            .increment_or_create(&DocumentPath::review_count(rating.card_id), COUNT_FIELD, 1)
            .await?;
        info!(
            "[pr-01] Recorded rating for card {} by {} (count={})",
            rating.card_id, rating.user_id, count
        );
        Ok(())
    }

    async fn get_rating(
        &self,
        card_id: OnChainCardId,
        user_id: &Address,
    ) -> Result<Option<RatingRecord>, MetadataStoreError> {
        let path = DocumentPath::rating(card_id, user_id)?;
        match self.db.get(&path).await? {
            Some(doc) => {
                let parsed: RatingDocument = serde_json::from_value(Value::Object(doc))?;
                Ok(Some(RatingRecord::try_from(parsed)?))
            }
            None => Ok(None),
        }
    }

    async fn list_ratings(
        &self,
        card_id: OnChainCardId,
    ) -> Result<Vec<RatingRecord>, MetadataStoreError> {
        let docs = self.db.list(&CollectionPath::ratings(card_id)).await?;
        let mut ratings = Vec::with_capacity(docs.len());
        for (key, doc) in docs {
            match serde_json::from_value::<RatingDocument>(Value::Object(doc)) {
                Ok(parsed) => ratings.push(RatingRecord::try_from(parsed)?),
                Err(e) => debug!("[pr-01] Skipping malformed rating {}: {}", key, e),
            }
        }
        Ok(ratings)
    }

    async fn has_user_rated(
        &self,
        card_id: OnChainCardId,
        user_id: &Address,
    ) -> Result<bool, MetadataStoreError> {
        let path = DocumentPath::rating(card_id, user_id)?;
        Ok(self.db.get(&path).await?.is_some())
    }

    async fn get_rating_count(&self, card_id: OnChainCardId) -> Result<u64, MetadataStoreError> {
        let doc = self.db.get(&DocumentPath::review_count(card_id)).await?;
        Ok(doc
            .and_then(|d| d.get(COUNT_FIELD).and_then(Value::as_u64))
            .unwrap_or(0))
    }
}
