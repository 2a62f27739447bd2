//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod memory_db;

pub use memory_db::InMemoryDocumentDatabase;
