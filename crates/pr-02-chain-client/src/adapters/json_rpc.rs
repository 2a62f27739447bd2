//! Ethereum JSON-RPC Review Contract Adapter
//!
//! Talks to a node through `eth_call`, `eth_sendTransaction` (the node or
//! wallet behind it signs), `eth_getTransactionReceipt` and `eth_getBalance`.

use crate::domain::abi::{
    decode_exact, encode_call, encode_submit_encrypted_rating, CREATE_REVIEW_CARD_SIGNATURE,
    CREATION_FEE_SIGNATURE, GET_ENCRYPTED_STATS_SIGNATURE,
};
use crate::domain::{ChainError, EncryptedStats};
use crate::ports::outbound::{ReviewContract, WalletProvider};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use shared_types::{
    Address, CiphertextHandle, InputProof, LogEntry, OnChainCardId, Receipt, TxHash, Wei, Word,
    U256,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between receipt polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Receipt polls before giving up.
const DEFAULT_MAX_POLLS: u32 = 120;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Transaction receipt as returned by the node.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    status: Option<String>,
    gas_used: String,
    #[serde(default)]
    logs: Vec<RpcLog>,
}

/// Log entry as returned by the node.
#[derive(Debug, Deserialize)]
struct RpcLog {
    address: String,
    topics: Vec<String>,
    data: String,
}

/// Raw JSON-RPC transport.
#[derive(Clone)]
pub struct JsonRpcClient {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    /// Create a client for `rpc_url`.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        // reqwest::Client::new() is infallible; the builder only fails on TLS setup.
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    /// Make a JSON-RPC call.
    async fn call<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, ChainError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::Rpc(format!("{} request failed: {}", method, e)))?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| ChainError::Rpc(format!("{} response unreadable: {}", method, e)))?;

        if let Some(error) = rpc_response.error {
            return Err(ChainError::Rpc(format!(
                "{} error {}: {}",
                method, error.code, error.message
            )));
        }
        Ok(rpc_response.result)
    }

    async fn call_required<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ChainError> {
        self.call(method, params)
            .await?
            .ok_or_else(|| ChainError::Rpc(format!("{} response missing result", method)))
    }

    /// `eth_call` against the latest block.
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let params = json!([{ "to": to.as_str(), "data": to_hex(data) }, "latest"]);
        let result: String = self.call_required("eth_call", params).await?;
        parse_hex_bytes(&result)
    }

    /// `eth_sendTransaction`; returns the transaction hash.
    pub async fn send_transaction(
        &self,
        from: &Address,
        to: &Address,
        value: Wei,
        data: &[u8],
        gas_limit: Option<u64>,
    ) -> Result<TxHash, ChainError> {
        // Validated here so a malformed address never reaches the node.
        from.to_bytes()?;
        let mut tx = json!({
            "from": from.as_str(),
            "to": to.as_str(),
            "value": format!("0x{:x}", value.0),
            "data": to_hex(data),
        });
        if let Some(gas) = gas_limit {
            tx["gas"] = json!(format!("{:#x}", gas));
        }
        let result: String = self.call_required("eth_sendTransaction", json!([tx])).await?;
        Ok(TxHash(parse_word(&result)?))
    }

    /// `eth_getTransactionReceipt`; `None` while pending.
    pub async fn get_receipt(&self, tx_hash: &TxHash) -> Result<Option<Receipt>, ChainError> {
        let raw: Option<RpcReceipt> = self
            .call("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
            .await?;
        match raw {
            Some(r) if r.block_number.is_some() => convert_receipt(r).map(Some),
            _ => Ok(None),
        }
    }

    /// `eth_getBalance` at the latest block.
    pub async fn get_balance(&self, account: &Address) -> Result<Wei, ChainError> {
        let result: String = self
            .call_required("eth_getBalance", json!([account.as_str(), "latest"]))
            .await?;
        parse_hex_u256(&result).map(Wei)
    }
}

/// Review contract reached over JSON-RPC.
pub struct JsonRpcReviewContract {
    rpc: JsonRpcClient,
    address: Address,
    poll_interval: Duration,
    max_polls: u32,
}

impl JsonRpcReviewContract {
    /// Contract at `address` behind `rpc`.
    pub fn new(rpc: JsonRpcClient, address: Address) -> Self {
        Self {
            rpc,
            address,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override receipt polling.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, ChainError> {
        for _ in 0..self.max_polls {
            if let Some(receipt) = self.rpc.get_receipt(&tx_hash).await? {
                if !receipt.success {
                    warn!("[pr-02] Transaction {} reverted", tx_hash);
                    return Err(ChainError::TransactionFailed(tx_hash));
                }
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
        Err(ChainError::ReceiptTimeout(tx_hash))
    }
}

#[async_trait]
impl ReviewContract for JsonRpcReviewContract {
    fn address(&self) -> &Address {
        &self.address
    }

    async fn creation_fee(&self) -> Result<Wei, ChainError> {
        let data = encode_call(CREATION_FEE_SIGNATURE, &[]);
        let out = self.rpc.eth_call(&self.address, &data).await?;
        let [fee] = decode_exact::<1>(&out)?;
        Ok(Wei(U256::from_big_endian(&fee)))
    }

    async fn create_review_card(
        &self,
        from: &Address,
        value: Wei,
    ) -> Result<Receipt, ChainError> {
        let data = encode_call(CREATE_REVIEW_CARD_SIGNATURE, &[]);
        let tx_hash = self
            .rpc
            .send_transaction(from, &self.address, value, &data, None)
            .await?;
        info!("[pr-02] createReviewCard sent: {}", tx_hash);
        self.wait_for_receipt(tx_hash).await
    }

    async fn submit_encrypted_rating(
        &self,
        from: &Address,
        card_id: OnChainCardId,
        handle: &CiphertextHandle,
        proof: &InputProof,
        gas_limit: u64,
    ) -> Result<Receipt, ChainError> {
        let data = encode_submit_encrypted_rating(card_id, handle, proof);
        let tx_hash = self
            .rpc
            .send_transaction(from, &self.address, Wei::zero(), &data, Some(gas_limit))
            .await?;
        info!("[pr-02] submitEncryptedRating({}) sent: {}", card_id, tx_hash);
        self.wait_for_receipt(tx_hash).await
    }

    async fn get_encrypted_stats(
        &self,
        card_id: OnChainCardId,
    ) -> Result<EncryptedStats, ChainError> {
        let data = encode_call(GET_ENCRYPTED_STATS_SIGNATURE, &[card_id.to_word()]);
        let out = self.rpc.eth_call(&self.address, &data).await?;
        let [sum, count] = decode_exact::<2>(&out)?;
        debug!("[pr-02] Encrypted stats read for card {}", card_id);
        Ok(EncryptedStats {
            sum: CiphertextHandle(sum),
            count: CiphertextHandle(count),
        })
    }

    async fn balance_of(&self, account: &Address) -> Result<Wei, ChainError> {
        self.rpc.get_balance(account).await
    }
}

/// Wallet provider backed by a JSON-RPC endpoint.
///
/// Every call builds a fresh contract handle over the shared transport.
pub struct JsonRpcProvider {
    rpc: JsonRpcClient,
    contract: Address,
}

impl JsonRpcProvider {
    /// Provider for `contract` at `rpc_url`.
    pub fn new(rpc_url: impl Into<String>, contract: Address) -> Self {
        Self {
            rpc: JsonRpcClient::new(rpc_url),
            contract,
        }
    }
}

impl WalletProvider for JsonRpcProvider {
    fn contract(&self) -> Option<Arc<dyn ReviewContract>> {
        Some(Arc::new(JsonRpcReviewContract::new(
            self.rpc.clone(),
            self.contract.clone(),
        )))
    }
}

fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Parse a `0x`-prefixed byte string.
fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, ChainError> {
    hex::decode(strip_hex_prefix(s)).map_err(|e| ChainError::Decode(format!("{}: {}", s, e)))
}

/// Parse a hex quantity into `u64`.
fn parse_hex_u64(s: &str) -> Result<u64, ChainError> {
    u64::from_str_radix(strip_hex_prefix(s), 16)
        .map_err(|e| ChainError::Decode(format!("{}: {}", s, e)))
}

/// Parse a hex quantity into `U256`.
fn parse_hex_u256(s: &str) -> Result<U256, ChainError> {
    U256::from_str_radix(strip_hex_prefix(s), 16)
        .map_err(|e| ChainError::Decode(format!("{}: {:?}", s, e)))
}

/// Parse a 32-byte hex word.
fn parse_word(s: &str) -> Result<Word, ChainError> {
    parse_hex_bytes(s)?
        .try_into()
        .map_err(|_| ChainError::Decode(format!("{} is not a 32-byte word", s)))
}

fn convert_receipt(raw: RpcReceipt) -> Result<Receipt, ChainError> {
    let logs = raw
        .logs
        .into_iter()
        .map(|log| {
            Ok(LogEntry {
                address: Address::new(log.address),
                topics: log
                    .topics
                    .iter()
                    .map(|t| parse_word(t))
                    .collect::<Result<_, ChainError>>()?,
                data: parse_hex_bytes(&log.data)?,
            })
        })
        .collect::<Result<Vec<_>, ChainError>>()?;

    Ok(Receipt {
        tx_hash: TxHash(parse_word(&raw.transaction_hash)?),
        block_number: raw.block_number.as_deref().map(parse_hex_u64).transpose()?.unwrap_or(0),
        success: raw.status.as_deref().map(parse_hex_u64).transpose()? != Some(0),
        gas_used: parse_hex_u64(&raw.gas_used)?,
        logs,
    })
}
