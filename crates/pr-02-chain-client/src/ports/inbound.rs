//! # Inbound Ports
//!
//! API traits defining what the Chain Client subsystem can do.

use crate::domain::{ChainError, EncryptedStats};
use async_trait::async_trait;
use shared_types::{Address, CiphertextHandle, InputProof, OnChainCardId, Receipt};

/// Reader of a card's encrypted aggregates.
///
/// Split out so the encryption gateway can depend on this alone.
#[async_trait]
pub trait StatsReader: Send + Sync {
    /// `(sum, count)` handles for a card.
    async fn read_encrypted_stats(
        &self,
        card_id: OnChainCardId,
    ) -> Result<EncryptedStats, ChainError>;
}

/// Chain client API - inbound port.
#[async_trait]
pub trait ChainClientApi: StatsReader {
    /// Configured contract address.
    fn contract_address(&self) -> &Address;

    /// Whether a wallet provider is injected.
    fn has_provider(&self) -> bool;

    /// Creation fee as decimal ether; `None` without a provider or on failure.
    async fn read_creation_fee(&self) -> Option<String>;

    /// Account balance as decimal ether; `None` without a provider or on failure.
    async fn read_balance(&self, account: &Address) -> Option<String>;

    /// Pay `fee_ether` to create a card; resolves with the mined receipt.
    async fn create_card(&self, signer: &Address, fee_ether: &str)
        -> Result<Receipt, ChainError>;

    /// Card id created by `creator` in this receipt.
    fn find_card_created(&self, receipt: &Receipt, creator: &Address) -> Option<OnChainCardId>;

    /// Submit an encrypted rating; resolves with the mined receipt.
    async fn submit_rating(
        &self,
        signer: &Address,
        card_id: OnChainCardId,
        handle: &CiphertextHandle,
        proof: &InputProof,
    ) -> Result<Receipt, ChainError>;
}
