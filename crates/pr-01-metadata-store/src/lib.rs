//! # PR-01 Metadata Store
//!
//! CRUD facade over a document database holding card metadata and per-user
//! rating existence records.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Schema
//!
//! | Path | Key | Fields |
//! |------|-----|--------|
//! | `cards` | generated | `id`, `title`, `description?`, `creator`, `createdAt` |
//! | `cards/{cardId}/ratings` | wallet address | `userId`, `rating`, `createdAt`, `cardId` |
//! | `reviewCounts` | on-chain card id | `count` |
//!
//! The plaintext rating is stored only so a user can see whether they already
//! voted. Aggregates come from the chain, never from this store.
//!
//! ## Module Structure
//!
//! ```text
//! pr-01-metadata-store/
//! ├── domain/          # Records, document paths, errors
//! ├── ports/           # MetadataStoreApi (inbound), DocumentDatabase (outbound)
//! ├── adapters/        # InMemoryDocumentDatabase
//! └── service.rs       # MetadataStoreClient
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryDocumentDatabase;
pub use domain::{
    CardDocument, CollectionPath, Document, DocumentPath, MetadataStoreError, NewCardRecord,
    RatingRecord, RawCardRecord, CARDS_COLLECTION, RATINGS_SUBCOLLECTION,
    REVIEW_COUNTS_COLLECTION,
};
pub use ports::{DocumentDatabase, MetadataStoreApi};
pub use service::MetadataStoreClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
