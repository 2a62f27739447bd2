//! HTTP Relayer Adapter
//!
//! FHE SDK backed by a remote relayer. Public decryption is a POST to
//! `{relayer_url}/v1/public-decrypt` with the handles as `0x` hex; the
//! relayer answers with one ABI word per handle, in request order.
//!
//! Client-side input encryption needs the network's TFHE public key and
//! the compact-list encoder, neither of which this client carries, so
//! encrypted inputs built on this runtime are refused with
//! [`SdkError::Rejected`]. Reads and decryption of deployed cards work.

use crate::domain::{EncryptedInputs, GatewayError, NetworkConfig, SdkError};
use crate::ports::outbound::{EncryptedInputBuilder, FheInstance, FheSdk};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use shared_types::{Address, CiphertextHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Path of the public-decrypt endpoint.
const PUBLIC_DECRYPT_PATH: &str = "/v1/public-decrypt";

/// Public-decrypt request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicDecryptRequest {
    ciphertext_handles: Vec<String>,
    extra_data: &'static str,
}

/// Public-decrypt response body.
#[derive(Debug, Deserialize)]
struct PublicDecryptResponse {
    response: Vec<PublicDecryptEntry>,
}

#[derive(Debug, Deserialize)]
struct PublicDecryptEntry {
    decrypted_value: String,
}

/// FHE runtime that delegates to a relayer over HTTP.
#[derive(Clone)]
pub struct RelayerFheRuntime {
    http_client: reqwest::Client,
}

impl RelayerFheRuntime {
    /// Runtime with a default HTTP client.
    pub fn new() -> Self {
        // reqwest::Client::new() is infallible; the builder only fails on TLS setup.
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http_client }
    }
}

impl Default for RelayerFheRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FheSdk for RelayerFheRuntime {
    async fn load(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn create_instance(
        &self,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn FheInstance>, GatewayError> {
        let base = network.relayer_url.trim_end_matches('/');
        let url = reqwest::Url::parse(base).map_err(|e| {
            GatewayError::InitializationFailed(format!("relayer url {}: {}", base, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::InitializationFailed(format!(
                "relayer url {} is not http(s)",
                base
            )));
        }
        info!(
            "[pr-03] Relayer instance for {} (chain {}) at {}",
            network.name, network.chain_id, base
        );
        Ok(Arc::new(RelayerInstance {
            http_client: self.http_client.clone(),
            decrypt_url: format!("{}{}", base, PUBLIC_DECRYPT_PATH),
        }))
    }
}

struct RelayerInstance {
    http_client: reqwest::Client,
    decrypt_url: String,
}

#[async_trait]
impl FheInstance for RelayerInstance {
    fn create_encrypted_input(
        &self,
        _contract: &Address,
        _user: &Address,
    ) -> Box<dyn EncryptedInputBuilder> {
        Box::new(UnsupportedInput)
    }

    async fn public_decrypt(
        &self,
        handles: &[CiphertextHandle],
    ) -> Result<HashMap<CiphertextHandle, u64>, SdkError> {
        let request = PublicDecryptRequest {
            ciphertext_handles: handles.iter().map(ToString::to_string).collect(),
            extra_data: "0x00",
        };

        let response = self
            .http_client
            .post(&self.decrypt_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Network(format!("public decrypt request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("[pr-03] Relayer answered {}: {}", status, body);
            return Err(classify_status(status, body));
        }

        let body: PublicDecryptResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Rejected(format!("public decrypt response unreadable: {}", e)))?;
        let values = decode_values(handles, &body)?;
        debug!("[pr-03] Relayer decrypted {} handle(s)", values.len());
        Ok(values)
    }
}

struct UnsupportedInput;

#[async_trait]
impl EncryptedInputBuilder for UnsupportedInput {
    fn add64(&mut self, _value: u64) {}

    async fn encrypt(self: Box<Self>) -> Result<EncryptedInputs, SdkError> {
        Err(SdkError::Rejected(
            "input encryption needs the network public key, which the relayer runtime does not load"
                .to_string(),
        ))
    }
}

/// Overload and server faults read as an outage; other refusals are final.
fn classify_status(status: StatusCode, body: String) -> SdkError {
    let message = format!("relayer returned {}: {}", status, body);
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        SdkError::Network(message)
    } else {
        SdkError::Rejected(message)
    }
}

/// Split the relayer's concatenated ABI words into one `u64` per handle.
fn decode_values(
    handles: &[CiphertextHandle],
    body: &PublicDecryptResponse,
) -> Result<HashMap<CiphertextHandle, u64>, SdkError> {
    let entry = body
        .response
        .first()
        .ok_or_else(|| SdkError::Rejected("empty public decrypt response".to_string()))?;
    let raw = entry
        .decrypted_value
        .strip_prefix("0x")
        .unwrap_or(&entry.decrypted_value);
    let bytes = hex::decode(raw)
        .map_err(|e| SdkError::Rejected(format!("decrypted value is not hex: {}", e)))?;
    if bytes.len() != handles.len() * 32 {
        return Err(SdkError::Rejected(format!(
            "expected {} decrypted word(s), got {} bytes",
            handles.len(),
            bytes.len()
        )));
    }

    handles
        .iter()
        .zip(bytes.chunks_exact(32))
        .map(|(handle, word)| {
            let (high, low) = word.split_at(24);
            if high.iter().any(|b| *b != 0) {
                return Err(SdkError::Rejected(format!("value for {} exceeds 64 bits", handle)));
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(low);
            Ok((*handle, u64::from_be_bytes(buf)))
        })
        .collect()
}
