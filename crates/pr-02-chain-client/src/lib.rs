//! # PR-02 Chain Client
//!
//! Reads and writes the review contract: creation fee, payable card
//! creation, encrypted rating submission and encrypted aggregate reads.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Contract Surface
//!
//! | Function | Kind |
//! |----------|------|
//! | `creationFee() -> uint256` | view |
//! | `createReviewCard()` | payable, emits `CardCreated(address indexed creator, uint256 cardId)` |
//! | `submitEncryptedRating(uint256, bytes32, bytes)` | gas ceiling 500 000 |
//! | `getEncryptedStats(uint256) -> (bytes32, bytes32)` | view |
//!
//! The card id of a new card is recovered from the creation receipt by a
//! typed, fail-closed decode of `CardCreated` (see [`domain::events`]).
//!
//! ## Module Structure
//!
//! ```text
//! pr-02-chain-client/
//! ├── domain/          # ABI encoding, CardCreated decoding, errors
//! ├── ports/           # ChainClientApi + StatsReader (inbound), ReviewContract + WalletProvider (outbound)
//! ├── adapters/        # InMemoryReviewContract, JsonRpcReviewContract, SessionProvider
//! └── service.rs       # ChainClient
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    InMemoryReviewContract, JsonRpcClient, JsonRpcProvider, JsonRpcReviewContract,
    SessionProvider,
};
pub use domain::{find_card_created, CardCreated, ChainError, EncryptedStats};
pub use ports::{ChainClientApi, ReviewContract, StatsReader, WalletProvider};
pub use service::{ChainClient, DEFAULT_RATING_GAS_LIMIT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
