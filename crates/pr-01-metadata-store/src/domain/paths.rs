//! # Document Paths
//!
//! Slash-separated paths in the document database. Collections have an odd
//! number of segments, documents an even number.

use std::fmt;

use shared_types::{Address, OnChainCardId};

use super::errors::MetadataStoreError;

/// Top-level card collection.
pub const CARDS_COLLECTION: &str = "cards";

/// Per-card ratings subcollection name.
pub const RATINGS_SUBCOLLECTION: &str = "ratings";

/// Per-card review counter collection.
pub const REVIEW_COUNTS_COLLECTION: &str = "reviewCounts";

fn validate(path: &str, want_even: bool) -> Result<(), MetadataStoreError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) || (segments.len() % 2 == 0) != want_even {
        return Err(MetadataStoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Path to a collection, e.g. `cards` or `cards/7/ratings`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Parse a collection path.
    pub fn new(path: impl Into<String>) -> Result<Self, MetadataStoreError> {
        let path = path.into();
        validate(&path, false)?;
        Ok(Self(path))
    }

    /// The `cards` collection.
    pub fn cards() -> Self {
        Self(CARDS_COLLECTION.to_string())
    }

    /// `cards/{cardId}/ratings`.
    pub fn ratings(card_id: OnChainCardId) -> Self {
        Self(format!(
            "{}/{}/{}",
            CARDS_COLLECTION, card_id, RATINGS_SUBCOLLECTION
        ))
    }

    /// Path of a child document.
    pub fn doc(&self, id: &str) -> Result<DocumentPath, MetadataStoreError> {
        DocumentPath::new(format!("{}/{}", self.0, id))
    }

    /// Path as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path to a document, e.g. `cards/abc` or `reviewCounts/7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Parse a document path.
    pub fn new(path: impl Into<String>) -> Result<Self, MetadataStoreError> {
        let path = path.into();
        validate(&path, true)?;
        Ok(Self(path))
    }

    /// `cards/{recordId}`.
    pub fn card(record_id: &str) -> Result<Self, MetadataStoreError> {
        CollectionPath::cards().doc(record_id)
    }

    /// `cards/{cardId}/ratings/{userId}`; the address is used as typed.
    pub fn rating(card_id: OnChainCardId, user_id: &Address) -> Result<Self, MetadataStoreError> {
        CollectionPath::ratings(card_id).doc(user_id.as_str())
    }

    /// `reviewCounts/{cardId}`.
    pub fn review_count(card_id: OnChainCardId) -> Self {
        Self(format!("{}/{}", REVIEW_COUNTS_COLLECTION, card_id))
    }

    /// Last segment.
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Parent collection.
    pub fn parent(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CollectionPath(parent.to_string()),
            None => CollectionPath(String::new()),
        }
    }

    /// Path as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_path_keeps_address_spelling() {
        let path = DocumentPath::rating(OnChainCardId(7), &Address::new("0xABC")).unwrap();
        assert_eq!(path.as_str(), "cards/7/ratings/0xABC");
        assert_eq!(path.id(), "0xABC");
        assert_eq!(path.parent().as_str(), "cards/7/ratings");
    }

    #[test]
    fn test_review_count_path() {
        assert_eq!(DocumentPath::review_count(OnChainCardId(7)).as_str(), "reviewCounts/7");
    }

    #[test]
    fn test_invalid_paths() {
        tokio_test::assert_err!(DocumentPath::new("cards"));
        assert!(DocumentPath::new("cards//x").is_err());
        assert!(CollectionPath::new("cards/abc").is_err());
        assert!(DocumentPath::card("").is_err());
        tokio_test::assert_err!(DocumentPath::card("a/b"));
    }
}
