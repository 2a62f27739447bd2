//! # Domain Entities
//!
//! Values read from the review contract.

use shared_types::CiphertextHandle;

/// Encrypted running aggregates for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedStats {
    /// Handle of the encrypted sum of ratings.
    pub sum: CiphertextHandle,
    /// Handle of the encrypted number of ratings.
    pub count: CiphertextHandle,
}
