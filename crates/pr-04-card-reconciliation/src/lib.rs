//! # PR-04 Card Reconciliation
//!
//! Keeps a local card list consistent with the metadata store, the review
//! contract and the FHE relayer, and runs the two mutating workflows.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Per-Card State Machine
//!
//! ```text
//! Unloaded ──pass──▶ Listed ──id present──▶ StatsPending ──┬──▶ StatsReady
//!                                                          └──▶ StatsDegraded
//! ```
//!
//! Every pass carries a generation. A background decryption result lands
//! only on the card (looked up by `doc_id`) published by the same pass.
//!
//! ## Workflows
//!
//! - **Create card**: store record (empty id) → creation tx → `CardCreated`
//!   decode → backfill id.
//! - **Submit rating**: encrypt → rating tx mined → vote and counter written
//!   to the store.
//!
//! ## Module Structure
//!
//! ```text
//! pr-04-card-reconciliation/
//! ├── domain/          # Card, StatsState, CardBook, notices, workflow values, errors
//! ├── ports/           # CardReconciliationApi (inbound), WalletSession (outbound)
//! ├── adapters/        # LocalWallet
//! ├── application/     # CardOrchestrator, FanOut
//! └── config.rs        # RatingsConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::LocalWallet;
pub use application::{CardOrchestrator, FanOut, OrchestratorSnapshot};
pub use config::{RatingsConfig, DEFAULT_CONTRACT_ADDRESS, DEFAULT_CREATION_FEE, DEFAULT_RPC_URL};
pub use domain::{
    Card, CardBook, CreateCardData, CreateOutcome, DegradedReason, Notice, NoticeKind,
    OrchestratorError, RatingOutcome, ReviewStatus, StatsState, SubmitReviewData, WalletError,
    MAX_RATING, MIN_RATING,
};
pub use ports::{CardReconciliationApi, WalletSession};

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
