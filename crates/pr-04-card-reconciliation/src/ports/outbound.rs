//! # Outbound Ports
//!
//! The orchestrator's own dependency: the wallet session. The metadata
//! store, chain client and encryption gateway are consumed through their
//! subsystems' inbound APIs.

use shared_types::Address;

pub use pr_01_metadata_store::MetadataStoreApi;
pub use pr_02_chain_client::ChainClientApi;
pub use pr_03_encryption_gateway::EncryptionGatewayApi;

/// Wallet session - outbound port.
pub trait WalletSession: Send + Sync {
    /// Connected account, if any.
    fn address(&self) -> Option<Address>;

    /// Ask the user to connect (opens the wallet's connect prompt).
    fn request_connection(&self);
}
