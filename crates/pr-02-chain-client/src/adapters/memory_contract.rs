//! In-Memory Review Contract Adapter
//!
//! Simulates the deployed review contract: payable card creation with a fee
//! check, `CardCreated` events, and encrypted sum/count accumulation through
//! an FHE coprocessor. Used for local development and tests.

use crate::domain::{CardCreated, ChainError, EncryptedStats};
use crate::ports::outbound::ReviewContract;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::hashing::keccak256_many;
use shared_types::{
    Address, CiphertextHandle, HandleEvaluator, InputProof, OnChainCardId, Receipt, TxHash, Wei,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Gas charged for `createReviewCard`.
pub const CREATE_CARD_GAS: u64 = 120_000;

/// Gas charged for `submitEncryptedRating`.
pub const SUBMIT_RATING_GAS: u64 = 350_000;

/// Per-card encrypted aggregates.
#[derive(Debug, Clone)]
struct CardState {
    creator: Address,
    sum: CiphertextHandle,
    count: CiphertextHandle,
}

#[derive(Debug)]
struct ContractState {
    fee: Wei,
    next_card_id: u64,
    cards: BTreeMap<u64, CardState>,
    balances: HashMap<Address, Wei>,
    block_number: u64,
    nonce: u64,
}

impl ContractState {
    fn next_receipt(&mut self, from: &Address, gas_used: u64) -> Receipt {
        self.nonce += 1;
        self.block_number += 1;
        let tx_hash = TxHash(keccak256_many(&[
            from.to_lowercase().as_bytes(),
            &self.nonce.to_be_bytes(),
        ]));
        Receipt {
            tx_hash,
            block_number: self.block_number,
            success: true,
            gas_used,
            logs: Vec::new(),
        }
    }
}

/// In-memory review contract.
pub struct InMemoryReviewContract {
    address: Address,
    evaluator: Arc<dyn HandleEvaluator>,
    state: RwLock<ContractState>,
    /// Simulated node outage: every call fails with `Rpc`.
    offline: AtomicBool,
    /// Drop events from creation receipts.
    suppress_events: AtomicBool,
}

impl InMemoryReviewContract {
    /// Deploy at `address` with the given creation fee.
    pub fn new(address: Address, fee: Wei, evaluator: Arc<dyn HandleEvaluator>) -> Self {
        Self {
            address,
            evaluator,
            state: RwLock::new(ContractState {
                fee,
                next_card_id: 1,
                cards: BTreeMap::new(),
                balances: HashMap::new(),
                block_number: 0,
                nonce: 0,
            }),
            offline: AtomicBool::new(false),
            suppress_events: AtomicBool::new(false),
        }
    }

    /// Id the next created card receives.
    pub fn with_next_card_id(self, next: u64) -> Self {
        self.state.write().next_card_id = next;
        self
    }

    /// Credit an account.
    pub fn fund(&self, account: &Address, amount: Wei) {
        let mut state = self.state.write();
        let balance = state.balances.entry(account.clone()).or_default();
        balance.0 = balance.0.saturating_add(amount.0);
    }

    /// Change the creation fee.
    pub fn set_fee(&self, fee: Wei) {
        self.state.write().fee = fee;
    }

    /// Toggle a node outage.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Toggle event suppression on card creation.
    pub fn set_suppress_events(&self, suppress: bool) {
        self.suppress_events.store(suppress, Ordering::SeqCst);
    }

    /// Number of cards created.
    pub fn card_count(&self) -> usize {
        self.state.read().cards.len()
    }

    /// Creator of a card.
    pub fn creator_of(&self, card_id: OnChainCardId) -> Option<Address> {
        self.state.read().cards.get(&card_id.0).map(|c| c.creator.clone())
    }

    fn check_online(&self) -> Result<(), ChainError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("node unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewContract for InMemoryReviewContract {
    fn address(&self) -> &Address {
        &self.address
    }

    async fn creation_fee(&self) -> Result<Wei, ChainError> {
        self.check_online()?;
        Ok(self.state.read().fee)
    }

    async fn create_review_card(
        &self,
        from: &Address,
        value: Wei,
    ) -> Result<Receipt, ChainError> {
        self.check_online()?;
        let mut state = self.state.write();

        if value < state.fee {
            return Err(ChainError::InsufficientFee {
                required: state.fee,
                provided: value,
            });
        }
        let balance = state.balances.get(from).copied().unwrap_or_default();
        if balance < value {
            return Err(ChainError::InsufficientFunds {
                balance,
                needed: value,
            });
        }

        let card_id = OnChainCardId(state.next_card_id);
        let event = CardCreated {
            creator: from.clone(),
            card_id,
        }
        .to_log(&self.address)?;

        state.next_card_id += 1;
        state.balances.insert(from.clone(), Wei(balance.0 - value.0));
        let treasury = state.balances.entry(self.address.clone()).or_default();
        treasury.0 = treasury.0.saturating_add(value.0);

        let zero = self.evaluator.trivial_encrypt(0);
        state.cards.insert(
            card_id.0,
            CardState {
                creator: from.clone(),
                sum: zero,
                count: zero,
            },
        );

        let mut receipt = state.next_receipt(from, CREATE_CARD_GAS);
        if !self.suppress_events.load(Ordering::SeqCst) {
            receipt.logs.push(event);
        }
        info!(
            "[pr-02] Card {} created by {} in block {}",
            card_id, from, receipt.block_number
        );
        Ok(receipt)
    }

    async fn submit_encrypted_rating(
        &self,
        from: &Address,
        card_id: OnChainCardId,
        handle: &CiphertextHandle,
        proof: &InputProof,
        gas_limit: u64,
    ) -> Result<Receipt, ChainError> {
        self.check_online()?;
        if gas_limit < SUBMIT_RATING_GAS {
            return Err(ChainError::OutOfGas {
                limit: gas_limit,
                required: SUBMIT_RATING_GAS,
            });
        }

        let mut state = self.state.write();
        let card = state
            .cards
            .get(&card_id.0)
            .cloned()
            .ok_or(ChainError::UnknownCard(card_id))?;
        if !self
            .evaluator
            .verify_input(handle, proof, &self.address, from)
        {
            return Err(ChainError::InvalidInputProof(card_id));
        }

        let one = self.evaluator.trivial_encrypt(1);
        let updated = CardState {
            sum: self.evaluator.add(&card.sum, handle)?,
            count: self.evaluator.add(&card.count, &one)?,
            creator: card.creator,
        };
        state.cards.insert(card_id.0, updated);
        // Superseded aggregates stay resolvable for decryptions already in flight.
        self.evaluator.release(&one);
        self.evaluator.release(handle);

        let receipt = state.next_receipt(from, SUBMIT_RATING_GAS);
        debug!("[pr-02] Encrypted rating accepted for card {}", card_id);
        Ok(receipt)
    }

    async fn get_encrypted_stats(
        &self,
        card_id: OnChainCardId,
    ) -> Result<EncryptedStats, ChainError> {
        self.check_online()?;
        let state = self.state.read();
        let card = state
            .cards
            .get(&card_id.0)
            .ok_or(ChainError::UnknownCard(card_id))?;
        Ok(EncryptedStats {
            sum: card.sum,
            count: card.count,
        })
    }

    async fn balance_of(&self, account: &Address) -> Result<Wei, ChainError> {
        self.check_online()?;
        Ok(self
            .state
            .read()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default())
    }
}
