//! Local Wallet Adapter
//!
//! A wallet session held in memory. Connection requests are counted and,
//! when an account is configured for it, answered immediately.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use shared_types::Address;
use tracing::info;

use crate::ports::WalletSession;

/// In-memory wallet session.
#[derive(Debug, Default)]
pub struct LocalWallet {
    account: RwLock<Option<Address>>,
    auto_connect: Option<Address>,
    requests: AtomicUsize,
}

impl LocalWallet {
    /// Disconnected wallet that ignores connection requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet already connected as `account`.
    pub fn connected(account: Address) -> Self {
        Self {
            account: RwLock::new(Some(account)),
            ..Self::default()
        }
    }

    /// Connect as `account` whenever a connection is requested.
    pub fn with_auto_connect(mut self, account: Address) -> Self {
        self.auto_connect = Some(account);
        self
    }

    /// Connect as `account`.
    pub fn connect(&self, account: Address) {
        info!("[pr-04] Wallet connected: {}", account);
        *self.account.write() = Some(account);
    }

    /// Drop the connection.
    pub fn disconnect(&self) {
        info!("[pr-04] Wallet disconnected");
        *self.account.write() = None;
    }

    /// Connection prompts opened so far.
    pub fn connection_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl WalletSession for LocalWallet {
    fn address(&self) -> Option<Address> {
        self.account.read().clone()
    }

    fn request_connection(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(account) = &self.auto_connect {
            self.connect(account.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_auto_connect() {
        let wallet = LocalWallet::new();
        wallet.request_connection();
        assert_eq!(wallet.connection_requests(), 1);
        assert!(wallet.address().is_none());
    }

    #[test]
    fn test_auto_connect() {
        let wallet = LocalWallet::new().with_auto_connect(Address::new("0xABC"));
        wallet.request_connection();
        assert_eq!(wallet.address(), Some(Address::new("0xabc")));
        wallet.disconnect();
        assert!(wallet.address().is_none());
    }
}
