//! # Domain Errors
//!
//! Error types for the Encryption Gateway.

use pr_02_chain_client::ChainError;
use shared_types::ParseError;
use thiserror::Error;

/// Failures reported by the FHE SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// The relayer could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The relayer or runtime refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Encryption gateway error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// `initialize` has not completed.
    #[error("FHE instance not initialized")]
    Uninitialized,

    /// The runtime could not be loaded or the instance created.
    #[error("FHE initialization failed: {0}")]
    InitializationFailed(String),

    /// The relayer is unreachable.
    #[error("Decryption service is temporarily unavailable: {0}")]
    ServiceUnavailable(String),

    /// The relayer answered but did not produce a value.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Handle is not a 32-byte value.
    #[error("Invalid ciphertext handle for decryption: {0}")]
    InvalidHandle(String),

    /// Input encryption failed.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Contract address could not be normalised.
    #[error(transparent)]
    InvalidAddress(#[from] ParseError),

    /// Encrypted aggregates could not be read.
    #[error("Failed to read encrypted stats: {0}")]
    StatsRead(#[from] ChainError),
}

impl GatewayError {
    /// Whether the failure is a relayer outage rather than a bad request.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, GatewayError::ServiceUnavailable(_))
    }
}
