//! # Outbound Ports
//!
//! The document database the Metadata Store is written against.

use crate::domain::{CollectionPath, Document, DocumentPath, MetadataStoreError};
use async_trait::async_trait;

/// Document database - outbound port.
///
/// Mirrors the small subset of a hosted document store the client uses.
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    /// Insert under a generated key; returns the key.
    async fn add(
        &self,
        collection: &CollectionPath,
        doc: Document,
    ) -> Result<String, MetadataStoreError>;

    /// Create or replace.
    async fn set(&self, path: &DocumentPath, doc: Document) -> Result<(), MetadataStoreError>;

    /// Merge fields into an existing document; `NotFound` if it is absent.
    async fn update(&self, path: &DocumentPath, fields: Document)
        -> Result<(), MetadataStoreError>;

    /// Read a document.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, MetadataStoreError>;

    /// Direct children of a collection as `(key, document)` pairs.
    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, MetadataStoreError>;

    /// Atomically add `by` to an integer field, creating the document with
    /// `field = by` when it does not exist. Returns the new value.
    async fn increment_or_create(
        &self,
        path: &DocumentPath,
        field: &str,
        by: i64,
    ) -> Result<i64, MetadataStoreError>;
}
