//! Gas price oracle.
//!
//! The funding service asks a [`GasStation`] for the current tiers on every
//! call that carries no explicit gas price. Nothing here caches prices.

pub mod fixed;
pub mod rpc;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::config::schema::{GasStationConfig, GasStationSource};

pub use fixed::FixedGasStation;
pub use rpc::RpcGasStation;
pub use types::{GasPrices, GasStationError, GasStationResult, GasTier, GWEI};

/// Source of current gas price tiers.
#[async_trait]
pub trait GasStation: Send + Sync {
    async fn get_gas_prices(&self) -> GasStationResult<GasPrices>;
}

/// Build the configured gas station.
pub fn build_gas_station(
    config: &GasStationConfig,
    client: &BlockchainClient,
) -> Arc<dyn GasStation> {
    match config.source {
        GasStationSource::Rpc => Arc::new(RpcGasStation::new(client.clone())),
        GasStationSource::Fixed => Arc::new(FixedGasStation::from_config(&config.fixed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainConfig;

    #[tokio::test]
    async fn test_fixed_source_needs_no_node() {
        let client = BlockchainClient::new(BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 1,
        })
        .unwrap();
        let config = GasStationConfig {
            source: GasStationSource::Fixed,
            ..Default::default()
        };

        let prices = build_gas_station(&config, &client).get_gas_prices().await.unwrap();
        assert_eq!(prices.tier(GasTier::Standard), 2 * GWEI);
        assert_eq!(prices.tier(GasTier::Fastest), 5 * GWEI);
    }
}
