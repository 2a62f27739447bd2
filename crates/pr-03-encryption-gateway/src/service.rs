//! # FHE Gateway Service
//!
//! Explicit gateway handle. It starts uninitialized; `initialize` loads the
//! runtime and stores one instance bound to the configured network. The
//! handle is shared by `Arc` instead of living in a global.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    DecryptedStats, EncryptedInput, GatewayError, NetworkConfig, SdkError,
};
use crate::ports::{EncryptionGatewayApi, FheInstance, FheSdk};
use pr_02_chain_client::StatsReader;
use shared_types::{Address, CiphertextHandle, OnChainCardId};

/// FHE gateway over an SDK.
pub struct FheGateway {
    sdk: Arc<dyn FheSdk>,
    network: NetworkConfig,
    instance: RwLock<Option<Arc<dyn FheInstance>>>,
}

impl FheGateway {
    /// Uninitialized gateway for `network`.
    pub fn new(sdk: Arc<dyn FheSdk>, network: NetworkConfig) -> Self {
        Self {
            sdk,
            network,
            instance: RwLock::new(None),
        }
    }

    /// Network the instance is bound to.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Parse a `0x` + 64 hex digit handle and decrypt it.
    pub async fn decrypt_hex(&self, handle: &str) -> Result<u64, GatewayError> {
        let parsed: CiphertextHandle = handle
            .parse()
            .map_err(|_| GatewayError::InvalidHandle(handle.to_string()))?;
        self.decrypt_handle(&parsed).await
    }

    fn instance(&self) -> Result<Arc<dyn FheInstance>, GatewayError> {
        self.instance.read().clone().ok_or(GatewayError::Uninitialized)
    }
}

fn map_decrypt_error(err: SdkError) -> GatewayError {
    match err {
        SdkError::Network(msg) => GatewayError::ServiceUnavailable(msg),
        SdkError::Rejected(msg) => GatewayError::DecryptionFailed(msg),
    }
}

#[async_trait]
impl EncryptionGatewayApi for FheGateway {
    async fn initialize(&self) -> Result<(), GatewayError> {
        self.sdk.load().await?;
        let instance = self.sdk.create_instance(&self.network).await?;
        *self.instance.write() = Some(instance);
        info!("[pr-03] FHE instance initialized for {}", self.network.name);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.instance.read().is_some()
    }

    async fn encrypt(
        &self,
        rating: u64,
        contract: &Address,
        user: &Address,
    ) -> Result<EncryptedInput, GatewayError> {
        let instance = self.instance()?;
        let contract = contract.to_checksum()?;
        debug!(
            "[pr-03] Encrypting rating for contract {} user {}",
            contract, user
        );

        let mut input = instance.create_encrypted_input(&contract, user);
        input.add64(rating);
        let encrypted = input
            .encrypt()
            .await
            .map_err(|e| GatewayError::EncryptionFailed(e.to_string()))?;
        let handle = encrypted
            .handles
            .first()
            .copied()
            .ok_or_else(|| GatewayError::EncryptionFailed("no handle produced".to_string()))?;
        Ok(EncryptedInput {
            handle,
            proof: encrypted.input_proof,
        })
    }

    async fn decrypt_handle(&self, handle: &CiphertextHandle) -> Result<u64, GatewayError> {
        let instance = self.instance()?;
        let values = instance
            .public_decrypt(std::slice::from_ref(handle))
            .await
            .map_err(|e| {
                let err = map_decrypt_error(e);
                if err.is_service_unavailable() {
                    warn!("[pr-03] Relayer unavailable: {}", err);
                }
                err
            })?;
        values
            .get(handle)
            .copied()
            .ok_or_else(|| GatewayError::DecryptionFailed(format!("no value for {}", handle)))
    }

    async fn try_decrypt_stats(
        &self,
        card_id: OnChainCardId,
        reader: &dyn StatsReader,
    ) -> Result<DecryptedStats, GatewayError> {
        self.instance()?;
        let encrypted = reader.read_encrypted_stats(card_id).await?;
        let sum = self.decrypt_handle(&encrypted.sum).await?;
        let count = self.decrypt_handle(&encrypted.count).await?;
        let stats = DecryptedStats::from_totals(sum, count);
        debug!(
            "[pr-03] Card {} stats: sum={} count={} average={:.2}",
            card_id, stats.sum, stats.count, stats.average
        );
        Ok(stats)
    }
}
