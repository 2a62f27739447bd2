//! # Domain Errors
//!
//! Error types for the Metadata Store.

use thiserror::Error;

/// Metadata store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataStoreError {
    /// Update targeted a document that does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Path has the wrong number of segments or an empty segment.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// A record could not be converted to or from a document.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The database could not be reached.
    #[error("Document database unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for MetadataStoreError {
    fn from(err: serde_json::Error) -> Self {
        MetadataStoreError::Serialization(err.to_string())
    }
}
