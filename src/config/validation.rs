//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit covers a transfer)
//! - Check that URLs, addresses and ether amounts parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FunderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;

use crate::blockchain::types::BlockReference;
use crate::config::schema::{FunderConfig, GasStationSource};

/// Minimum gas any value transfer consumes.
pub const MIN_TRANSFER_GAS: u64 = 21_000;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FunderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.blockchain;
    if let Err(e) = chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}': {}", chain.rpc_url, e),
        ));
    }
    for failover in &chain.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}': {}", failover, e),
            ));
        }
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be non-zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    let funding = &config.funding;
    match parse_ether(&funding.max_eth_to_send) {
        Ok(ceiling) if ceiling == U256::ZERO => errors.push(ValidationError::new(
            "funding.max_eth_to_send",
            "must be greater than zero",
        )),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new(
            "funding.max_eth_to_send",
            format!("invalid ether amount '{}': {}", funding.max_eth_to_send, e),
        )),
    }
    if funding.default_gas_limit < MIN_TRANSFER_GAS {
        errors.push(ValidationError::new(
            "funding.default_gas_limit",
            format!("must be at least {}", MIN_TRANSFER_GAS),
        ));
    }
    if let Err(e) = funding.block_reference.parse::<BlockReference>() {
        errors.push(ValidationError::new("funding.block_reference", e.to_string()));
    }
    if funding.retry.max_attempts == 0 {
        errors.push(ValidationError::new(
            "funding.retry.max_attempts",
            "must be at least 1",
        ));
    }
    if funding.retry.base_delay_ms > funding.retry.max_delay_ms {
        errors.push(ValidationError::new(
            "funding.retry.base_delay_ms",
            "must not exceed max_delay_ms",
        ));
    }

    if config.gas_station.source == GasStationSource::Fixed {
        let tiers = &config.gas_station.fixed;
        if tiers.standard_gwei == 0 {
            errors.push(ValidationError::new(
                "gas_station.fixed.standard_gwei",
                "must be greater than zero",
            ));
        }
        let ordered = tiers.lowest_gwei <= tiers.safe_low_gwei
            && tiers.safe_low_gwei <= tiers.standard_gwei
            && tiers.standard_gwei <= tiers.fast_gwei
            && tiers.fast_gwei <= tiers.fastest_gwei;
        if !ordered {
            errors.push(ValidationError::new(
                "gas_station.fixed",
                "tiers must be non-decreasing from lowest to fastest",
            ));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FunderConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FunderConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.blockchain.rpc_timeout_secs = 0;
        config.funding.max_eth_to_send = "lots".to_string();
        config.funding.default_gas_limit = 20_000;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "blockchain.rpc_url",
                "blockchain.rpc_timeout_secs",
                "funding.max_eth_to_send",
                "funding.default_gas_limit",
            ]
        );
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let mut config = FunderConfig::default();
        config.funding.max_eth_to_send = "0".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "funding.max_eth_to_send");
    }

    #[test]
    fn test_bad_block_reference() {
        let mut config = FunderConfig::default();
        config.funding.block_reference = "earliest-ish".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "funding.block_reference");
    }

    #[test]
    fn test_fixed_tiers_must_be_ordered() {
        let mut config = FunderConfig::default();
        config.gas_station.source = GasStationSource::Fixed;
        config.gas_station.fixed.fast_gwei = 1;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "gas_station.fixed");

        // Unordered tiers are ignored when the RPC source is used.
        config.gas_station.source = GasStationSource::Rpc;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = FunderConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("nowhere"));
    }
}
