//! # PR-03 Encryption Gateway
//!
//! Client-side FHE: encrypts ratings into inputs bound to a contract and a
//! user, and asks the relayer to publicly decrypt aggregate handles.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Lifecycle
//!
//! ```text
//! FheGateway::new(sdk, network)      uninitialized
//!        │ initialize()
//!        ▼
//! instance bound to network          encrypt / decrypt_handle / decrypt_stats
//! ```
//!
//! Calls before `initialize` fail with [`GatewayError::Uninitialized`].
//! Relayer network failures surface as [`GatewayError::ServiceUnavailable`],
//! distinct from [`GatewayError::DecryptionFailed`].
//!
//! ## Module Structure
//!
//! ```text
//! pr-03-encryption-gateway/
//! ├── domain/          # NetworkConfig, EncryptedInput, DecryptedStats, errors
//! ├── ports/           # EncryptionGatewayApi (inbound), FheSdk + FheInstance (outbound)
//! ├── adapters/        # LocalFheRuntime, RelayerFheRuntime
//! └── service.rs       # FheGateway
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{EncryptionRecord, LocalFheRuntime, RelayerFheRuntime};
pub use domain::{
    format_average_rating, DecryptedStats, EncryptedInput, EncryptedInputs, GatewayError,
    NetworkConfig, SdkError,
};
pub use ports::{EncryptedInputBuilder, EncryptionGatewayApi, FheInstance, FheSdk};
pub use service::FheGateway;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
