//! # Chain Client Service
//!
//! Application service over the wallet provider. A contract handle is taken
//! from the provider at the start of every call and dropped at its end.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{find_card_created, ChainError, EncryptedStats};
use crate::ports::{ChainClientApi, ReviewContract, StatsReader, WalletProvider};
use shared_types::{Address, CiphertextHandle, InputProof, OnChainCardId, Receipt, Wei};

/// Gas ceiling for `submitEncryptedRating`.
pub const DEFAULT_RATING_GAS_LIMIT: u64 = 500_000;

/// Chain client over a wallet provider.
pub struct ChainClient {
    provider: Arc<dyn WalletProvider>,
    contract_address: Address,
    rating_gas_limit: u64,
}

impl ChainClient {
    /// Client for the contract at `contract_address`.
    pub fn new(provider: Arc<dyn WalletProvider>, contract_address: Address) -> Self {
        Self {
            provider,
            contract_address,
            rating_gas_limit: DEFAULT_RATING_GAS_LIMIT,
        }
    }

    /// Override the rating gas ceiling.
    pub fn with_rating_gas_limit(mut self, gas_limit: u64) -> Self {
        self.rating_gas_limit = gas_limit;
        self
    }

    fn contract(&self) -> Result<Arc<dyn ReviewContract>, ChainError> {
        self.provider.contract().ok_or(ChainError::NoProvider)
    }
}

#[async_trait]
impl StatsReader for ChainClient {
    async fn read_encrypted_stats(
        &self,
        card_id: OnChainCardId,
    ) -> Result<EncryptedStats, ChainError> {
        self.contract()?.get_encrypted_stats(card_id).await
    }
}

#[async_trait]
impl ChainClientApi for ChainClient {
    fn contract_address(&self) -> &Address {
        &self.contract_address
    }

    fn has_provider(&self) -> bool {
        self.provider.contract().is_some()
    }

    async fn read_creation_fee(&self) -> Option<String> {
        let contract = self.provider.contract()?;
        match contract.creation_fee().await {
            Ok(fee) => Some(fee.to_ether_string()),
            Err(e) => {
                debug!("[pr-02] Creation fee unavailable: {}", e);
                None
            }
        }
    }

    async fn read_balance(&self, account: &Address) -> Option<String> {
        let contract = self.provider.contract()?;
        match contract.balance_of(account).await {
            Ok(balance) => Some(balance.to_ether_string()),
            Err(e) => {
                debug!("[pr-02] Balance of {} unavailable: {}", account, e);
                None
            }
        }
    }

    async fn create_card(&self, signer: &Address, fee_ether: &str) -> Result<Receipt, ChainError> {
        let value = Wei::from_ether(fee_ether)?;
        let contract = self.contract()?;
        info!("[pr-02] Creating card for {} paying {} ether", signer, fee_ether);
        contract.create_review_card(signer, value).await
    }

    fn find_card_created(&self, receipt: &Receipt, creator: &Address) -> Option<OnChainCardId> {
        find_card_created(receipt, &self.contract_address, creator)
    }

    async fn submit_rating(
        &self,
        signer: &Address,
        card_id: OnChainCardId,
        handle: &CiphertextHandle,
        proof: &InputProof,
    ) -> Result<Receipt, ChainError> {
        let contract = self.contract()?;
        info!("[pr-02] Submitting encrypted rating for card {}", card_id);
        contract
            .submit_encrypted_rating(signer, card_id, handle, proof, self.rating_gas_limit)
            .await
    }
}
