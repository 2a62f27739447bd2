//! # Adapters Module
//!
//! FHE runtime implementations: the in-process simulator and the HTTP
//! relayer client.

pub mod local_runtime;
pub mod relayer;

pub use local_runtime::{EncryptionRecord, LocalFheRuntime};
pub use relayer::RelayerFheRuntime;
