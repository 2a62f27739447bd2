//! # Shared Deployment
//!
//! One document database, one simulated contract and one FHE runtime,
//! shared by any number of clients. Each client is a full orchestrator with
//! its own wallet, chain client and gateway, the way two browsers would see
//! the same backend.

use std::sync::Arc;

use pr_01_metadata_store::{InMemoryDocumentDatabase, MetadataStoreClient};
use pr_02_chain_client::{ChainClient, InMemoryReviewContract, SessionProvider};
use pr_03_encryption_gateway::{FheGateway, LocalFheRuntime, NetworkConfig};
use pr_04_card_reconciliation::{
    CardOrchestrator, CardReconciliationApi, CreateCardData, CreateOutcome, FanOut, LocalWallet,
    OrchestratorError, RatingsConfig,
};
use shared_types::{Address, ManualTimeSource, OnChainCardId, Wei};

/// Contract address used by every deployment.
pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Card creator in most scenarios.
pub const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Second rater.
pub const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Third rater.
pub const CAROL: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

/// Creation fee of the simulated contract, in ether.
pub const FEE: &str = "0.15";

/// Orchestrator over the in-memory adapters.
pub type Orchestrator = CardOrchestrator<
    MetadataStoreClient<InMemoryDocumentDatabase>,
    ChainClient,
    FheGateway,
    LocalWallet,
>;

/// Parse an ether amount known to be valid.
pub fn ether(amount: &str) -> Wei {
    Wei::from_ether(amount).expect("valid ether amount")
}

/// Backend shared by all clients.
pub struct Deployment {
    /// Metadata store contents.
    pub db: Arc<InMemoryDocumentDatabase>,
    /// Simulated review contract.
    pub contract: Arc<InMemoryReviewContract>,
    /// FHE runtime behind the contract and every gateway.
    pub runtime: LocalFheRuntime,
    /// Clock shared by all clients.
    pub clock: Arc<ManualTimeSource>,
}

/// One user's view of the deployment.
pub struct Client {
    /// Orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// Wallet session.
    pub wallet: Arc<LocalWallet>,
}

impl Deployment {
    /// Fresh deployment; the first card gets on-chain id 1.
    pub fn new() -> Self {
        let runtime = LocalFheRuntime::new();
        let contract = Arc::new(InMemoryReviewContract::new(
            Address::new(CONTRACT),
            ether(FEE),
            Arc::new(runtime.clone()),
        ));
        for account in [ALICE, BOB, CAROL] {
            contract.fund(&Address::new(account), ether("5"));
        }
        Self {
            db: Arc::new(InMemoryDocumentDatabase::new()),
            contract,
            runtime,
            clock: Arc::new(ManualTimeSource::new(1_700_000_000_000)),
        }
    }

    /// Client connected as `account`.
    pub fn client(&self, account: &str) -> Client {
        let wallet = Arc::new(LocalWallet::connected(Address::new(account)));
        let session = Arc::new(SessionProvider::new(self.contract.clone()));
        let chain = ChainClient::new(session, Address::new(CONTRACT));
        let gateway = FheGateway::new(Arc::new(self.runtime.clone()), NetworkConfig::local());
        let orchestrator = CardOrchestrator::new(
            RatingsConfig::for_testing(),
            Arc::new(MetadataStoreClient::new(self.db.clone())),
            Arc::new(chain),
            Arc::new(gateway),
            wallet.clone(),
        )
        .with_time_source(self.clock.clone());
        Client {
            orchestrator: Arc::new(orchestrator),
            wallet,
        }
    }

    /// Client with its gateway loaded and a first pass settled.
    pub async fn ready_client(&self, account: &str) -> Client {
        let client = self.client(account);
        client.settle_with(client.orchestrator.initialize().await).await;
        client
    }
}

impl Default for Deployment {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Run a pass and wait for every decryption it started.
    pub async fn settle(&self) {
        self.settle_with(self.orchestrator.reconcile().await).await;
    }

    async fn settle_with(&self, pass: Result<FanOut, OrchestratorError>) {
        pass.expect("reconciliation pass").wait().await;
    }

    /// Create a card and return its keys; panics unless it confirms.
    pub async fn create(&self, title: &str) -> (String, OnChainCardId) {
        let data = CreateCardData::new(title, Some("integration")).expect("valid title");
        match self.orchestrator.create_card(data).await {
            CreateOutcome::Confirmed { doc_id, card_id } => (doc_id, card_id),
            other => panic!("card creation did not confirm: {:?}", other),
        }
    }
}
