//! Static gas price tiers from configuration.

use async_trait::async_trait;

use crate::config::schema::FixedTiersConfig;
use crate::gas_station::types::{now_secs, GasPrices, GasStationResult, GWEI};
use crate::gas_station::GasStation;

/// Returns the same tiers on every call. Useful for local nodes and testnets
/// where `eth_gasPrice` is meaningless.
#[derive(Debug, Clone)]
pub struct FixedGasStation {
    prices: GasPrices,
}

impl FixedGasStation {
    pub fn new(prices: GasPrices) -> Self {
        Self { prices }
    }

    pub fn from_config(config: &FixedTiersConfig) -> Self {
        let wei = |gwei: u64| u128::from(gwei) * GWEI;
        Self::new(GasPrices {
            lowest: wei(config.lowest_gwei),
            safe_low: wei(config.safe_low_gwei),
            standard: wei(config.standard_gwei),
            fast: wei(config.fast_gwei),
            fastest: wei(config.fastest_gwei),
            last_update: 0,
        })
    }
}

#[async_trait]
impl GasStation for FixedGasStation {
    async fn get_gas_prices(&self) -> GasStationResult<GasPrices> {
        Ok(GasPrices {
            last_update: now_secs(),
            ..self.prices.clone()
        })
    }
}
