//! Wiring of the orchestrator to its adapters.
//!
//! Two stacks share one orchestrator type: the local development stack
//! (simulated contract, in-process FHE runtime) and the JSON-RPC stack
//! (contract on a node, decryption through the configured relayer). Card
//! metadata lives in the in-memory document database in both.

use std::sync::Arc;

use anyhow::{Context, Result};
use pr_01_metadata_store::{InMemoryDocumentDatabase, MetadataStoreClient};
use pr_02_chain_client::{
    ChainClient, InMemoryReviewContract, JsonRpcProvider, SessionProvider, WalletProvider,
};
use pr_03_encryption_gateway::{
    FheGateway, FheSdk, LocalFheRuntime, NetworkConfig, RelayerFheRuntime,
};
use pr_04_card_reconciliation::{CardOrchestrator, LocalWallet, RatingsConfig};
use shared_types::{Address, Wei};
use tracing::info;

/// First account of the local development node.
pub const DEV_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Balance given to the development account, in ether.
const DEV_FUNDING_ETHER: &str = "10";

/// Orchestrator as wired by the TUI.
pub type Orchestrator = CardOrchestrator<
    MetadataStoreClient<InMemoryDocumentDatabase>,
    ChainClient,
    FheGateway,
    LocalWallet,
>;

/// Chain provider, FHE runtime and the network it binds to.
type Adapters = (Arc<dyn WalletProvider>, Arc<dyn FheSdk>, NetworkConfig);

/// Which chain backend to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Simulated contract in process.
    Local,
    /// Contract on a JSON-RPC node.
    JsonRpc,
}

/// Build the orchestrator.
///
/// `account` connects the wallet up front; otherwise it connects on the
/// first request (as the development account when running locally).
pub fn build(
    config: RatingsConfig,
    backend: Backend,
    account: Option<Address>,
) -> Result<Orchestrator> {
    config.validate().context("invalid configuration")?;
    let contract_address = config.contract();
    let (provider, sdk, network): Adapters = match backend {
        Backend::Local => {
            let runtime = LocalFheRuntime::new();
            let contract = Arc::new(InMemoryReviewContract::new(
                contract_address.clone(),
                Wei::from_ether(&config.default_creation_fee)?,
                Arc::new(runtime.clone()),
            ));
            contract.fund(&Address::new(DEV_ACCOUNT), Wei::from_ether(DEV_FUNDING_ETHER)?);
            if let Some(account) = &account {
                contract.fund(account, Wei::from_ether(DEV_FUNDING_ETHER)?);
            }
            info!("[pr-tui] Local stack with simulated contract {}", contract_address);
            (
                Arc::new(SessionProvider::new(contract)),
                Arc::new(runtime),
                NetworkConfig::local(),
            )
        }
        Backend::JsonRpc => {
            info!(
                "[pr-tui] JSON-RPC stack at {} for contract {}, relayer {}",
                config.rpc_url, contract_address, config.network.relayer_url
            );
            (
                Arc::new(JsonRpcProvider::new(config.rpc_url.clone(), contract_address.clone())),
                Arc::new(RelayerFheRuntime::new()),
                config.network.clone(),
            )
        }
    };

    let wallet = match account {
        Some(account) => LocalWallet::connected(account),
        None if backend == Backend::Local => {
            LocalWallet::new().with_auto_connect(Address::new(DEV_ACCOUNT))
        }
        None => LocalWallet::new(),
    };

    let chain = ChainClient::new(provider, contract_address)
        .with_rating_gas_limit(config.rating_gas_limit);
    let gateway = FheGateway::new(sdk, network);
    let store = MetadataStoreClient::new(Arc::new(InMemoryDocumentDatabase::new()));

    Ok(CardOrchestrator::new(
        config,
        Arc::new(store),
        Arc::new(chain),
        Arc::new(gateway),
        Arc::new(wallet),
    ))
}
