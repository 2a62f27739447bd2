//! # Outbound Ports
//!
//! The deployed review contract and the wallet session that hands out
//! contract handles.

use crate::domain::{ChainError, EncryptedStats};
use async_trait::async_trait;
use shared_types::{Address, CiphertextHandle, InputProof, OnChainCardId, Receipt, Wei};
use std::sync::Arc;

/// Review contract - outbound port.
///
/// Mutating calls resolve once the transaction is mined.
#[async_trait]
pub trait ReviewContract: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> &Address;

    /// `creationFee()`.
    async fn creation_fee(&self) -> Result<Wei, ChainError>;

    /// `createReviewCard()` paying `value`.
    async fn create_review_card(&self, from: &Address, value: Wei)
        -> Result<Receipt, ChainError>;

    /// `submitEncryptedRating(cardId, handle, proof)` with a gas ceiling.
    async fn submit_encrypted_rating(
        &self,
        from: &Address,
        card_id: OnChainCardId,
        handle: &CiphertextHandle,
        proof: &InputProof,
        gas_limit: u64,
    ) -> Result<Receipt, ChainError>;

    /// `getEncryptedStats(cardId)`.
    async fn get_encrypted_stats(&self, card_id: OnChainCardId)
        -> Result<EncryptedStats, ChainError>;

    /// Native balance of an account.
    async fn balance_of(&self, account: &Address) -> Result<Wei, ChainError>;
}

/// Wallet provider - outbound port.
///
/// Returns a contract handle bound to the current wallet session, or `None`
/// when no provider is injected. Callers fetch a fresh handle per call and
/// never keep it.
pub trait WalletProvider: Send + Sync {
    /// Contract handle for this call.
    fn contract(&self) -> Option<Arc<dyn ReviewContract>>;
}
