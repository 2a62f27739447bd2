//! Local FHE Runtime Adapter
//!
//! In-process stand-in for the FHE SDK, the coprocessor and the relayer.
//! Ciphertexts are opaque salted handles; the plaintext behind each handle
//! lives only in the runtime's registry. The same runtime is handed to the
//! contract simulator as its [`HandleEvaluator`], so values encrypted here
//! can be summed on-chain and publicly decrypted afterwards.
//!
//! This is a development simulator. The contract releases the transient
//! handles of each rating, but every aggregate ever produced stays in the
//! registry for the life of the process.

use crate::domain::{EncryptedInputs, GatewayError, NetworkConfig, SdkError};
use crate::ports::outbound::{EncryptedInputBuilder, FheInstance, FheSdk};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::hashing::keccak256_many;
use shared_types::{Address, CiphertextHandle, EvaluationError, HandleEvaluator, InputProof};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// One recorded `createEncryptedInput` + `encrypt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionRecord {
    /// Values added to the input.
    pub values: Vec<u64>,
    /// Contract the input is bound to, as passed.
    pub contract: Address,
    /// User the input is bound to, as passed.
    pub user: Address,
}

#[derive(Default)]
struct Registry {
    salt: [u8; 32],
    counter: AtomicU64,
    plaintexts: RwLock<HashMap<CiphertextHandle, u64>>,
    encryptions: RwLock<Vec<EncryptionRecord>>,
    relayer_offline: AtomicBool,
    relayer_rejects: AtomicBool,
    load_fails: AtomicBool,
    decrypt_calls: AtomicUsize,
}

impl Registry {
    fn store(&self, value: u64) -> CiphertextHandle {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let handle = CiphertextHandle(keccak256_many(&[&self.salt, &n.to_be_bytes()]));
        self.plaintexts.write().insert(handle, value);
        handle
    }

    fn remove(&self, handle: &CiphertextHandle) {
        self.plaintexts.write().remove(handle);
    }

    fn lookup(&self, handle: &CiphertextHandle) -> Option<u64> {
        self.plaintexts.read().get(handle).copied()
    }

    fn proof_for(handles: &[CiphertextHandle], contract: &Address, user: &Address) -> InputProof {
        let mut parts: Vec<&[u8]> = handles.iter().map(|h| h.as_bytes().as_slice()).collect();
        let contract = contract.to_lowercase();
        let user = user.to_lowercase();
        parts.push(contract.as_bytes());
        parts.push(user.as_bytes());
        InputProof(keccak256_many(&parts).to_vec())
    }
}

/// In-process FHE runtime.
#[derive(Clone)]
pub struct LocalFheRuntime {
    registry: Arc<Registry>,
}

impl LocalFheRuntime {
    /// Fresh runtime with a random handle salt.
    pub fn new() -> Self {
        let registry = Registry {
            salt: rand::random(),
            ..Registry::default()
        };
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Toggle a relayer outage: decryption fails with a network error.
    pub fn set_relayer_offline(&self, offline: bool) {
        self.registry.relayer_offline.store(offline, Ordering::SeqCst);
    }

    /// Toggle relayer refusal: decryption fails with a rejection.
    pub fn set_relayer_rejects(&self, rejects: bool) {
        self.registry.relayer_rejects.store(rejects, Ordering::SeqCst);
    }

    /// Make the next `load` fail.
    pub fn set_load_fails(&self, fails: bool) {
        self.registry.load_fails.store(fails, Ordering::SeqCst);
    }

    /// Encryptions performed so far.
    pub fn encryptions(&self) -> Vec<EncryptionRecord> {
        self.registry.encryptions.read().clone()
    }

    /// Handles currently resolvable.
    pub fn live_handles(&self) -> usize {
        self.registry.plaintexts.read().len()
    }

    /// Number of `public_decrypt` calls.
    pub fn decrypt_calls(&self) -> usize {
        self.registry.decrypt_calls.load(Ordering::SeqCst)
    }
}

impl Default for LocalFheRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FheSdk for LocalFheRuntime {
    async fn load(&self) -> Result<(), GatewayError> {
        if self.registry.load_fails.load(Ordering::SeqCst) {
            return Err(GatewayError::InitializationFailed(
                "runtime could not be loaded".to_string(),
            ));
        }
        Ok(())
    }

    async fn create_instance(
        &self,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn FheInstance>, GatewayError> {
        info!(
            "[pr-03] Local FHE instance for {} (chain {})",
            network.name, network.chain_id
        );
        Ok(Arc::new(LocalFheInstance {
            registry: self.registry.clone(),
        }))
    }
}

impl HandleEvaluator for LocalFheRuntime {
    fn trivial_encrypt(&self, value: u64) -> CiphertextHandle {
        self.registry.store(value)
    }

    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EvaluationError> {
        let a = self
            .registry
            .lookup(lhs)
            .ok_or(EvaluationError::UnknownHandle(*lhs))?;
        let b = self
            .registry
            .lookup(rhs)
            .ok_or(EvaluationError::UnknownHandle(*rhs))?;
        Ok(self.registry.store(a.wrapping_add(b)))
    }

    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        contract: &Address,
        user: &Address,
    ) -> bool {
        self.registry.lookup(handle).is_some()
            && *proof == Registry::proof_for(std::slice::from_ref(handle), contract, user)
    }

    fn release(&self, handle: &CiphertextHandle) {
        self.registry.remove(handle);
    }
}

struct LocalFheInstance {
    registry: Arc<Registry>,
}

#[async_trait]
impl FheInstance for LocalFheInstance {
    fn create_encrypted_input(
        &self,
        contract: &Address,
        user: &Address,
    ) -> Box<dyn EncryptedInputBuilder> {
        Box::new(LocalInputBuilder {
            registry: self.registry.clone(),
            contract: contract.clone(),
            user: user.clone(),
            values: Vec::new(),
        })
    }

    async fn public_decrypt(
        &self,
        handles: &[CiphertextHandle],
    ) -> Result<HashMap<CiphertextHandle, u64>, SdkError> {
        self.registry.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if self.registry.relayer_offline.load(Ordering::SeqCst) {
            return Err(SdkError::Network("Failed to fetch".to_string()));
        }
        if self.registry.relayer_rejects.load(Ordering::SeqCst) {
            return Err(SdkError::Rejected("decryption not allowed".to_string()));
        }
        handles
            .iter()
            .map(|handle| {
                self.registry
                    .lookup(handle)
                    .map(|value| (*handle, value))
                    .ok_or_else(|| SdkError::Rejected(format!("unknown handle {}", handle)))
            })
            .collect()
    }
}

struct LocalInputBuilder {
    registry: Arc<Registry>,
    contract: Address,
    user: Address,
    values: Vec<u64>,
}

#[async_trait]
impl EncryptedInputBuilder for LocalInputBuilder {
    fn add64(&mut self, value: u64) {
        self.values.push(value);
    }

    async fn encrypt(self: Box<Self>) -> Result<EncryptedInputs, SdkError> {
        if self.values.is_empty() {
            return Err(SdkError::Rejected("encrypted input has no values".to_string()));
        }
        let handles: Vec<CiphertextHandle> =
            self.values.iter().map(|v| self.registry.store(*v)).collect();
        let input_proof = Registry::proof_for(&handles, &self.contract, &self.user);
        debug!(
            "[pr-03] Encrypted {} value(s) for {} / {}",
            handles.len(),
            self.contract,
            self.user
        );
        self.registry.encryptions.write().push(EncryptionRecord {
            values: self.values.clone(),
            contract: self.contract.clone(),
            user: self.user.clone(),
        });
        Ok(EncryptedInputs {
            handles,
            input_proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    async fn instance(runtime: &LocalFheRuntime) -> Arc<dyn FheInstance> {
        runtime.create_instance(&NetworkConfig::local()).await.unwrap()
    }

    #[tokio::test]
    async fn test_encrypt_then_decrypt() {
        let runtime = LocalFheRuntime::new();
        let fhe = instance(&runtime).await;
        for rating in 1..=5u64 {
            let mut input = fhe.create_encrypted_input(&Address::new(CONTRACT), &Address::new("0xABC"));
            input.add64(rating);
            let out = input.encrypt().await.unwrap();
            let decrypted = fhe.public_decrypt(&out.handles).await.unwrap();
            assert_eq!(decrypted[&out.handles[0]], rating);
        }
    }

    #[tokio::test]
    async fn test_single_value_proof_verifies() {
        let runtime = LocalFheRuntime::new();
        let fhe = instance(&runtime).await;
        let contract = Address::new(CONTRACT);
        let user = Address::new("0xABC");
        let mut input = fhe.create_encrypted_input(&contract, &user);
        input.add64(4);
        let out = input.encrypt().await.unwrap();

        assert!(runtime.verify_input(&out.handles[0], &out.input_proof, &contract, &user));
        assert!(!runtime.verify_input(
            &out.handles[0],
            &out.input_proof,
            &contract,
            &Address::new("0xDEF")
        ));
    }

    #[tokio::test]
    async fn test_homomorphic_add() {
        let runtime = LocalFheRuntime::new();
        let a = runtime.trivial_encrypt(2);
        let b = runtime.trivial_encrypt(3);
        let sum = runtime.add(&a, &b).unwrap();
        let fhe = instance(&runtime).await;
        assert_eq!(fhe.public_decrypt(&[sum]).await.unwrap()[&sum], 5);

        let unknown = CiphertextHandle([9u8; 32]);
        assert_eq!(
            runtime.add(&a, &unknown),
            Err(EvaluationError::UnknownHandle(unknown))
        );
    }

    #[tokio::test]
    async fn test_relayer_failures_are_typed() {
        let runtime = LocalFheRuntime::new();
        let fhe = instance(&runtime).await;
        let handle = runtime.trivial_encrypt(1);

        runtime.set_relayer_offline(true);
        assert!(matches!(
            fhe.public_decrypt(&[handle]).await,
            Err(SdkError::Network(_))
        ));

        runtime.set_relayer_offline(false);
        runtime.set_relayer_rejects(true);
        assert!(matches!(
            fhe.public_decrypt(&[handle]).await,
            Err(SdkError::Rejected(_))
        ));
        assert_eq!(runtime.decrypt_calls(), 2);
    }

    #[tokio::test]
    async fn test_rating_retains_only_new_aggregates() {
        use pr_02_chain_client::{InMemoryReviewContract, ReviewContract, DEFAULT_RATING_GAS_LIMIT};
        use shared_types::{OnChainCardId, Wei};

        let runtime = LocalFheRuntime::new();
        let contract_addr = Address::new(CONTRACT);
        let alice = Address::new("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let contract = InMemoryReviewContract::new(
            contract_addr.clone(),
            Wei::from_ether("0.15").unwrap(),
            Arc::new(runtime.clone()),
        );
        contract.fund(&alice, Wei::from_ether("1").unwrap());
        contract
            .create_review_card(&alice, Wei::from_ether("0.15").unwrap())
            .await
            .unwrap();
        let fhe = instance(&runtime).await;

        let before = runtime.live_handles();
        for stars in [4u64, 2] {
            let mut input = fhe.create_encrypted_input(&contract_addr, &alice);
            input.add64(stars);
            let out = input.encrypt().await.unwrap();
            contract
                .submit_encrypted_rating(
                    &alice,
                    OnChainCardId(1),
                    &out.handles[0],
                    &out.input_proof,
                    DEFAULT_RATING_GAS_LIMIT,
                )
                .await
                .unwrap();
        }
        assert_eq!(runtime.live_handles(), before + 4);

        let stats = contract.get_encrypted_stats(OnChainCardId(1)).await.unwrap();
        let values = fhe.public_decrypt(&[stats.sum, stats.count]).await.unwrap();
        assert_eq!(values[&stats.sum], 6);
        assert_eq!(values[&stats.count], 2);
    }

    #[tokio::test]
    async fn test_released_handle_no_longer_resolves() {
        let runtime = LocalFheRuntime::new();
        let handle = runtime.trivial_encrypt(5);
        runtime.release(&handle);
        let fhe = instance(&runtime).await;
        assert!(matches!(
            fhe.public_decrypt(&[handle]).await,
            Err(SdkError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_handles_are_unique_per_encryption() {
        let runtime = LocalFheRuntime::new();
        assert_ne!(runtime.trivial_encrypt(0), runtime.trivial_encrypt(0));
    }
}
