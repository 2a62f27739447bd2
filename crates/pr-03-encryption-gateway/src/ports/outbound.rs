//! # Outbound Ports
//!
//! The FHE SDK surface: a loadable runtime that creates network-bound
//! instances, an encrypted-input builder and relayer public decryption.

use crate::domain::{EncryptedInputs, GatewayError, NetworkConfig, SdkError};
use async_trait::async_trait;
use shared_types::{Address, CiphertextHandle};
use std::collections::HashMap;
use std::sync::Arc;

/// FHE SDK - outbound port.
#[async_trait]
pub trait FheSdk: Send + Sync {
    /// Load the runtime (key material, WASM or native library).
    async fn load(&self) -> Result<(), GatewayError>;

    /// Create an instance bound to one network.
    async fn create_instance(
        &self,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn FheInstance>, GatewayError>;
}

/// A network-bound SDK instance.
#[async_trait]
pub trait FheInstance: Send + Sync {
    /// Start an encrypted input bound to `contract` and `user`.
    fn create_encrypted_input(
        &self,
        contract: &Address,
        user: &Address,
    ) -> Box<dyn EncryptedInputBuilder>;

    /// Ask the relayer to publicly decrypt handles.
    async fn public_decrypt(
        &self,
        handles: &[CiphertextHandle],
    ) -> Result<HashMap<CiphertextHandle, u64>, SdkError>;
}

/// Encrypted input under construction.
#[async_trait]
pub trait EncryptedInputBuilder: Send {
    /// Append a 64-bit value.
    fn add64(&mut self, value: u64);

    /// Encrypt every appended value and produce the input proof.
    async fn encrypt(self: Box<Self>) -> Result<EncryptedInputs, SdkError>;
}
