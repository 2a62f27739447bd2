//! # Inbound Ports
//!
//! API trait defining what the Encryption Gateway subsystem can do.

use crate::domain::{DecryptedStats, EncryptedInput, GatewayError};
use async_trait::async_trait;
use pr_02_chain_client::StatsReader;
use shared_types::{Address, CiphertextHandle, OnChainCardId};

/// Encryption gateway API - inbound port.
#[async_trait]
pub trait EncryptionGatewayApi: Send + Sync {
    /// Load the runtime and create the instance; replaces any earlier one.
    async fn initialize(&self) -> Result<(), GatewayError>;

    /// Whether `initialize` has completed.
    fn is_initialized(&self) -> bool;

    /// Encrypt a rating bound to `contract` and `user`. The range is not checked.
    async fn encrypt(
        &self,
        rating: u64,
        contract: &Address,
        user: &Address,
    ) -> Result<EncryptedInput, GatewayError>;

    /// Publicly decrypt one handle.
    async fn decrypt_handle(&self, handle: &CiphertextHandle) -> Result<u64, GatewayError>;

    /// Read and decrypt a card's aggregates.
    async fn try_decrypt_stats(
        &self,
        card_id: OnChainCardId,
        reader: &dyn StatsReader,
    ) -> Result<DecryptedStats, GatewayError>;

    /// Same as `try_decrypt_stats`, collapsing any failure into zeros.
    async fn decrypt_stats(
        &self,
        card_id: OnChainCardId,
        reader: &dyn StatsReader,
    ) -> DecryptedStats {
        match self.try_decrypt_stats(card_id, reader).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("[pr-03] Stats for card {} fell back to zero: {}", card_id, e);
                DecryptedStats::zero()
            }
        }
    }
}
