//! Wallet Session Adapter
//!
//! A wallet provider whose contract handle can be swapped or removed at
//! runtime, standing in for an injected browser wallet.

use crate::ports::outbound::{ReviewContract, WalletProvider};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Wallet session holding an optional contract handle.
#[derive(Default)]
pub struct SessionProvider {
    contract: RwLock<Option<Arc<dyn ReviewContract>>>,
}

impl SessionProvider {
    /// Session with a provider injected.
    pub fn new(contract: Arc<dyn ReviewContract>) -> Self {
        Self {
            contract: RwLock::new(Some(contract)),
        }
    }

    /// Session with no provider.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Inject or replace the provider.
    pub fn connect(&self, contract: Arc<dyn ReviewContract>) {
        info!("[pr-02] Provider connected for {}", contract.address());
        *self.contract.write() = Some(contract);
    }

    /// Remove the provider.
    pub fn disconnect(&self) {
        info!("[pr-02] Provider disconnected");
        *self.contract.write() = None;
    }
}

impl WalletProvider for SessionProvider {
    fn contract(&self) -> Option<Arc<dyn ReviewContract>> {
        self.contract.read().clone()
    }
}
