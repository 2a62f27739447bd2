//! # Keccak-256 Hashing
//!
//! Ethereum flavour of SHA-3 used for event topics, function selectors and
//! EIP-55 address checksums.

use sha3::{Digest, Keccak256};

/// Hash data with Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple inputs as one concatenated message.
pub fn keccak256_many(inputs: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}
