//! Gas prices derived from the node's current gas price.

use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::gas_station::types::{GasPrices, GasStationError, GasStationResult, GasTier};
use crate::gas_station::GasStation;
use crate::observability::metrics;

/// Queries `eth_gasPrice` on every call and scales it into tiers.
#[derive(Debug, Clone)]
pub struct RpcGasStation {
    client: BlockchainClient,
}

impl RpcGasStation {
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GasStation for RpcGasStation {
    async fn get_gas_prices(&self) -> GasStationResult<GasPrices> {
        let base = self.client.get_gas_price().await.map_err(|e| {
            metrics::record_oracle_failure();
            GasStationError::Unavailable(e.to_string())
        })?;

        let prices = GasPrices::from_base(base);
        metrics::record_gas_price(GasTier::Standard.as_str(), prices.standard);
        tracing::debug!(
            base_wei = base,
            standard_wei = prices.standard,
            fast_wei = prices.fast,
            "Gas prices fetched from node"
        );
        Ok(prices)
    }
}
