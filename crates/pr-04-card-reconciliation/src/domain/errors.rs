//! # Domain Errors
//!
//! Error types for Card Reconciliation. Dependency errors are wrapped
//! transparently so user-facing messages carry the underlying text.

use pr_01_metadata_store::MetadataStoreError;
use pr_02_chain_client::ChainError;
use pr_03_encryption_gateway::GatewayError;
use thiserror::Error;

/// Wallet session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No account is connected.
    #[error("Wallet not connected")]
    NotConnected,
}

/// Orchestrator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// Wallet session problem.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Metadata store failure.
    #[error(transparent)]
    Store(#[from] MetadataStoreError),

    /// Chain failure.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Encryption gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// User input rejected before any call was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Configuration could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_text() {
        let err: OrchestratorError = ChainError::NoProvider.into();
        assert_eq!(err.to_string(), "No wallet provider available");

        let err: OrchestratorError = WalletError::NotConnected.into();
        assert_eq!(err.to_string(), "Wallet not connected");
    }
}
