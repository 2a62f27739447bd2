//! # Domain Entities
//!
//! Network binding, encrypted inputs and decrypted aggregates.

use serde::{Deserialize, Serialize};
use shared_types::{CiphertextHandle, InputProof};

/// Chain id of Sepolia.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Network an FHE instance is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable name.
    pub name: String,
    /// Host chain id.
    pub chain_id: u64,
    /// Relayer endpoint used for input registration and public decryption.
    pub relayer_url: String,
}

impl NetworkConfig {
    /// Sepolia testnet with the public relayer.
    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            relayer_url: "https://relayer.testnet.zama.cloud".to_string(),
        }
    }

    /// Local development network served by the in-process runtime.
    pub fn local() -> Self {
        Self {
            name: "local".to_string(),
            chain_id: 31_337,
            relayer_url: "memory://local".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

/// One encrypted input ready for a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    /// Ciphertext handle passed as `bytes32`.
    pub handle: CiphertextHandle,
    /// Proof binding the handle to contract and user.
    pub proof: InputProof,
}

/// Result of `encrypt` on an input builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInputs {
    /// One handle per added value, in order.
    pub handles: Vec<CiphertextHandle>,
    /// Proof covering every handle.
    pub input_proof: InputProof,
}

/// Decrypted aggregates for one card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecryptedStats {
    /// Sum of all ratings.
    pub sum: u64,
    /// Number of ratings.
    pub count: u64,
    /// `sum / count`, or 0 without ratings.
    pub average: f64,
}

impl DecryptedStats {
    /// The fallback used when decryption fails.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from totals.
    pub fn from_totals(sum: u64, count: u64) -> Self {
        let average = if count > 0 {
            sum as f64 / count as f64
        } else {
            0.0
        };
        Self {
            sum,
            count,
            average,
        }
    }
}

/// Display text for a card's average rating.
///
/// A zero average with reviews on record means decryption has not produced
/// a value, so the card reads as encrypted.
pub fn format_average_rating(average: f64, total_reviews: u64) -> String {
    if total_reviews > 0 && average == 0.0 {
        return "Encrypted".to_string();
    }
    if average == 0.0 {
        return "No ratings yet".to_string();
    }
    format!("{:.1}", average)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_from_totals() {
        let stats = DecryptedStats::from_totals(9, 2);
        assert_eq!(stats.average, 4.5);
        assert_eq!(DecryptedStats::from_totals(0, 0), DecryptedStats::zero());
    }

    #[test]
    fn test_format_average_rating() {
        assert_eq!(format_average_rating(0.0, 3), "Encrypted");
        assert_eq!(format_average_rating(0.0, 0), "No ratings yet");
        assert_eq!(format_average_rating(4.0, 1), "4.0");
        assert_eq!(format_average_rating(3.666, 3), "3.7");
    }
}
