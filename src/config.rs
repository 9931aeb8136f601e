use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{
    BUNDLE_TX_GAS_LIMIT, DEFAULT_RELAY_TIMEOUT_SECS, DEFAULT_RPC_TIMEOUT_SECS, POLYGON_CHAIN_ID,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    /// bor node endpoint (HTTP JSON-RPC)
    pub rpc_url: String,
    #[serde(default = "default_rpc_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearcherConfig {
    /// Searcher EOA address. Must match the key loaded from the environment.
    pub address: Address,
    /// Optional searcher contract the backrun calls into. When absent the
    /// backrun is a self-transfer carrying only the strategy payload.
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Environment variable holding the EOA private key. The key itself
    /// never appears in config files.
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastLaneConfig {
    /// PFL relay endpoint
    pub relay_url: String,
    /// Basic-auth username for the relay session
    pub auth_username: String,
    /// Environment variable holding the relay API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// FastLane auction contract (submitBid target)
    pub auction_contract: Address,
    /// Validators participating in the FastLane auction. Bundles are only
    /// built when the current proposer is in this set.
    pub participating_validators: Vec<Address>,
    #[serde(default = "default_relay_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub searcher: SearcherConfig,
    pub fastlane: FastLaneConfig,
}

fn default_rpc_timeout() -> u64 {
    DEFAULT_RPC_TIMEOUT_SECS
}

fn default_relay_timeout() -> u64 {
    DEFAULT_RELAY_TIMEOUT_SECS
}

fn default_gas_limit() -> u64 {
    BUNDLE_TX_GAS_LIMIT
}

fn default_private_key_env() -> String {
    "SEARCHER_PRIVATE_KEY".to_string()
}

fn default_api_key_env() -> String {
    "PFL_API_KEY".to_string()
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("설정 파일을 읽을 수 없습니다: {path}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("설정 파일 파싱 실패: {path}"))?;
        Ok(config)
    }

    /// Allow-list membership set for the validator gate.
    pub fn validator_set(&self) -> HashSet<Address> {
        self.fastlane.participating_validators.iter().copied().collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                chain_id: POLYGON_CHAIN_ID,
                name: "polygon".to_string(),
                rpc_url: "http://localhost:8545".to_string(),
                request_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            },
            searcher: SearcherConfig {
                address: Address::ZERO,
                contract_address: None,
                gas_limit: BUNDLE_TX_GAS_LIMIT,
                private_key_env: default_private_key_env(),
            },
            fastlane: FastLaneConfig {
                relay_url: "https://polygon-rpc.fastlane.xyz".to_string(),
                auth_username: String::new(),
                api_key_env: default_api_key_env(),
                auction_contract: Address::ZERO,
                participating_validators: Vec::new(),
                request_timeout_secs: DEFAULT_RELAY_TIMEOUT_SECS,
            },
        }
    }
}
