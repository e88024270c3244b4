//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the funder.
//! All types derive Serde traits for deserialization from config files.
//! The funder private key is deliberately absent: it is only ever read from
//! the environment (see [`crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR`]).

use serde::{Deserialize, Serialize};

/// Root configuration for the funder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FunderConfig {
    /// Chain connection settings.
    pub blockchain: BlockchainConfig,

    /// Funding limits and transaction defaults.
    pub funding: FundingConfig,

    /// Gas price source.
    pub gas_station: GasStationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
        }
    }
}

/// Funding limits and per-transfer defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FundingConfig {
    /// Maximum value a single funding call may transfer, in ether
    /// (decimal string, e.g. "0.1").
    pub max_eth_to_send: String,

    /// Gas limit used when the caller does not give one.
    pub default_gas_limit: u64,

    /// Block reference for nonce lookups ("pending", "latest" or a number).
    pub block_reference: String,

    /// Retry policy applied when a caller asks for retries.
    pub retry: RetryConfig,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            max_eth_to_send: "0.1".to_string(),
            default_gas_limit: 22_000,
            block_reference: "pending".to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for transaction submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of submission attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

/// Where gas prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GasStationSource {
    /// Derive tiers from the node's current gas price.
    #[default]
    Rpc,
    /// Use the static tiers from [`FixedTiersConfig`].
    Fixed,
}

/// Gas station configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GasStationConfig {
    pub source: GasStationSource,
    pub fixed: FixedTiersConfig,
}

/// Static gas price tiers in gwei.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FixedTiersConfig {
    pub lowest_gwei: u64,
    pub safe_low_gwei: u64,
    pub standard_gwei: u64,
    pub fast_gwei: u64,
    pub fastest_gwei: u64,
}

impl Default for FixedTiersConfig {
    fn default() -> Self {
        Self {
            lowest_gwei: 1,
            safe_low_gwei: 1,
            standard_gwei: 2,
            fast_gwei: 3,
            fastest_gwei: 5,
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line layout.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
