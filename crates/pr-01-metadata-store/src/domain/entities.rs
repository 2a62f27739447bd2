//! # Domain Entities
//!
//! Card and rating records as stored in the document database.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Address, OnChainCardId, Timestamp};

use super::errors::MetadataStoreError;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Convert a serializable record into a document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, MetadataStoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(MetadataStoreError::Serialization(format!(
            "expected object, got {}",
            other
        ))),
    }
}

/// Input for a new card record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCardRecord {
    /// Card title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creator wallet.
    pub creator: Address,
    /// Creation time in ms.
    pub created_at: Timestamp,
}

/// Card document layout in `cards/{recordId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    /// On-chain id as a decimal string; empty until confirmed.
    pub id: String,
    /// Card title.
    pub title: String,
    /// Optional description; omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creator wallet.
    pub creator: String,
    /// Creation time in ms.
    pub created_at: Timestamp,
}

impl From<&NewCardRecord> for CardDocument {
    fn from(record: &NewCardRecord) -> Self {
        Self {
            id: String::new(),
            title: record.title.clone(),
            description: record.description.clone(),
            creator: record.creator.as_str().to_string(),
            created_at: record.created_at,
        }
    }
}

/// Card record as read back, without any validation.
///
/// Documents written by other clients may lack fields or carry the wrong
/// types; every field except the key is therefore optional and the reader
/// decides what to discard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCardRecord {
    /// Document key.
    pub doc_id: String,
    /// On-chain id field (may be empty).
    pub id: Option<String>,
    /// Title field.
    pub title: Option<String>,
    /// Description field.
    pub description: Option<String>,
    /// Creator field.
    pub creator: Option<String>,
    /// Creation time field.
    pub created_at: Option<Timestamp>,
}

impl RawCardRecord {
    /// Read a card document leniently.
    pub fn from_document(doc_id: impl Into<String>, doc: &Document) -> Self {
        let string_field = |name: &str| doc.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            doc_id: doc_id.into(),
            id: string_field("id"),
            title: string_field("title"),
            description: string_field("description"),
            creator: string_field("creator"),
            created_at: doc.get("createdAt").and_then(Value::as_u64),
        }
    }

    /// Parsed on-chain id; `None` while the record is still pending.
    pub fn on_chain_id(&self) -> Option<OnChainCardId> {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .and_then(|id| id.parse().ok())
    }
}

/// One user's vote on one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingRecord {
    /// On-chain card id.
    pub card_id: OnChainCardId,
    /// Voter wallet; also the document key.
    pub user_id: Address,
    /// Stars, 1 to 5.
    pub rating: u8,
    /// Vote time in ms.
    pub created_at: Timestamp,
}

/// Rating document layout in `cards/{cardId}/ratings/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDocument {
    /// Voter wallet.
    pub user_id: String,
    /// Stars.
    pub rating: u8,
    /// Vote time in ms.
    pub created_at: Timestamp,
    /// On-chain card id as a decimal string.
    pub card_id: String,
}

impl From<&RatingRecord> for RatingDocument {
    fn from(record: &RatingRecord) -> Self {
        Self {
            user_id: record.user_id.as_str().to_string(),
            rating: record.rating,
            created_at: record.created_at,
            card_id: record.card_id.to_string(),
        }
    }
}

impl TryFrom<RatingDocument> for RatingRecord {
    type Error = MetadataStoreError;

    fn try_from(doc: RatingDocument) -> Result<Self, Self::Error> {
        let card_id = doc
            .card_id
            .parse()
            .map_err(|e: shared_types::ParseError| MetadataStoreError::Serialization(e.to_string()))?;
        Ok(Self {
            card_id,
            user_id: Address::new(doc.user_id),
            rating: doc.rating,
            created_at: doc.created_at,
        })
    }
}
