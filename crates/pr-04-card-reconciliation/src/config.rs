//! # Ratings Configuration
//!
//! Deployment settings for the orchestrator and the adapters it is wired to.
//!
//! The contract default is baked in at build time (`REVIEW_CONTRACT_ADDRESS`)
//! and every setting can be overridden at runtime:
//!
//! - `PR_CONTRACT_ADDRESS`: review contract
//! - `PR_RPC_URL`: Ethereum JSON-RPC endpoint
//! - `PR_RELAYER_URL`: FHE relayer endpoint
//! - `PR_CHAIN_ID`: host chain id
//! - `PR_CREATION_FEE`: fallback creation fee in ether
//! - `PR_RATING_GAS_LIMIT`: gas ceiling for rating transactions

use pr_02_chain_client::DEFAULT_RATING_GAS_LIMIT;
use pr_03_encryption_gateway::NetworkConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::domain::OrchestratorError;

/// Contract used when nothing was configured at build time.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Fee sent when the on-chain fee could not be read.
pub const DEFAULT_CREATION_FEE: &str = "0.15";

/// Local node endpoint.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingsConfig {
    /// Review contract address.
    pub contract_address: String,

    /// Network the FHE instance binds to.
    pub network: NetworkConfig,

    /// JSON-RPC endpoint of the host chain.
    pub rpc_url: String,

    /// Fee in ether used when `creationFee()` is unavailable.
    pub default_creation_fee: String,

    /// Gas ceiling for `submitEncryptedRating`.
    pub rating_gas_limit: u64,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            contract_address: option_env!("REVIEW_CONTRACT_ADDRESS")
                .unwrap_or(DEFAULT_CONTRACT_ADDRESS)
                .to_string(),
            network: NetworkConfig::default(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            default_creation_fee: DEFAULT_CREATION_FEE.to_string(),
            rating_gas_limit: DEFAULT_RATING_GAS_LIMIT,
        }
    }
}

impl RatingsConfig {
    /// Defaults overridden by `PR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(address) = lookup("PR_CONTRACT_ADDRESS") {
            config.contract_address = address;
        }
        if let Some(url) = lookup("PR_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(url) = lookup("PR_RELAYER_URL") {
            config.network.relayer_url = url;
        }
        if let Some(chain_id) = lookup("PR_CHAIN_ID").and_then(|v| v.parse().ok()) {
            config.network.chain_id = chain_id;
        }
        if let Some(fee) = lookup("PR_CREATION_FEE") {
            config.default_creation_fee = fee;
        }
        if let Some(limit) = lookup("PR_RATING_GAS_LIMIT").and_then(|v| v.parse().ok()) {
            config.rating_gas_limit = limit;
        }
        config
    }

    /// Local development stack.
    pub fn for_testing() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            network: NetworkConfig::local(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            default_creation_fee: DEFAULT_CREATION_FEE.to_string(),
            rating_gas_limit: DEFAULT_RATING_GAS_LIMIT,
        }
    }

    /// Contract address as a typed value.
    pub fn contract(&self) -> Address {
        Address::new(self.contract_address.clone())
    }

    /// Reject settings no workflow could use.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        self.contract()
            .to_bytes()
            .map_err(|e| OrchestratorError::Config(e.to_string()))?;
        if self.rating_gas_limit == 0 {
            return Err(OrchestratorError::Config(
                "rating gas limit must be positive".to_string(),
            ));
        }
        let fee_ok = self
            .default_creation_fee
            .parse::<f64>()
            .map(|fee| fee.is_finite() && fee >= 0.0)
            .unwrap_or(false);
        if !fee_ok {
            return Err(OrchestratorError::Config(format!(
                "invalid creation fee: {}",
                self.default_creation_fee
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_testing_config_is_valid() {
        let config = RatingsConfig::for_testing();
        tokio_test::assert_ok!(config.validate());
        assert_eq!(config.rating_gas_limit, 500_000);
        assert_eq!(config.default_creation_fee, "0.15");
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PR_RPC_URL", "http://node:8545"),
            ("PR_CHAIN_ID", "31337"),
            ("PR_RATING_GAS_LIMIT", "not-a-number"),
            ("PR_CREATION_FEE", "0.2"),
            ("PR_RELAYER_URL", "https://relayer.example"),
        ]
        .into_iter()
        .collect();
        let config = RatingsConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.network.chain_id, 31_337);
        assert_eq!(config.rating_gas_limit, DEFAULT_RATING_GAS_LIMIT);
        assert_eq!(config.default_creation_fee, "0.2");
        assert_eq!(config.network.relayer_url, "https://relayer.example");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RatingsConfig::for_testing();
        config.contract_address = "0x123".to_string();
        assert!(matches!(config.validate(), Err(OrchestratorError::Config(_))));

        let mut config = RatingsConfig::for_testing();
        config.default_creation_fee = "lots".to_string();
        assert!(config.validate().is_err());

        let mut config = RatingsConfig::for_testing();
        config.rating_gas_limit = 0;
        assert!(config.validate().is_err());
    }
}
