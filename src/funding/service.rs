//! The funding coordinator.
//!
//! # Flow of one `send_funds` call
//! ```text
//! FundingRequest
//!     → spend ceiling check         (ExceedsSpendCeiling, nothing else runs)
//!     → gas price: non-zero override or oracle standard tier   (OracleUnavailable)
//!     → ChainClient::send_value with the ceiling forwarded  (SubmissionFailed)
//!     → TransactionHandle
//! ```
//!
//! The service keeps no state between calls beyond the funder account and
//! the ceiling. It does not deduplicate: every successful call broadcasts a
//! new transfer.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{ChainClient, RpcChainClient, SendValue};
use crate::blockchain::types::TransactionHandle;
use crate::blockchain::wallet::Wallet;
use crate::config::schema::FunderConfig;
use crate::funding::types::{FundingError, FundingRequest, FundingResult, SpendCeiling};
use crate::gas_station::{build_gas_station, GasPrices, GasStation};
use crate::observability::metrics;

/// Sends native currency from the custodial funder account.
pub struct FundingService {
    chain: Arc<dyn ChainClient>,
    gas_station: Arc<dyn GasStation>,
    funder: Wallet,
    ceiling: SpendCeiling,
}

impl FundingService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        gas_station: Arc<dyn GasStation>,
        funder: Wallet,
        ceiling: SpendCeiling,
    ) -> Self {
        Self {
            chain,
            gas_station,
            funder,
            ceiling,
        }
    }

    /// Build the service from configuration, reading the funder key from
    /// the environment.
    pub fn from_config(config: &FunderConfig) -> FundingResult<Self> {
        let funder = Wallet::from_env(config.blockchain.chain_id)?;
        Self::with_funder(config, funder)
    }

    /// Build the RPC-backed service for an already loaded funder account.
    pub fn with_funder(config: &FunderConfig, funder: Wallet) -> FundingResult<Self> {
        let ceiling = SpendCeiling::from_ether(&config.funding.max_eth_to_send)?;
        let client = BlockchainClient::new(config.blockchain.clone())
            .map_err(|e| FundingError::Configuration(e.to_string()))?;
        let gas_station = build_gas_station(&config.gas_station, &client);
        let chain = Arc::new(RpcChainClient::new(client));

        tracing::info!(
            funder = %funder.address(),
            spend_ceiling = %ceiling,
            gas_source = ?config.gas_station.source,
            "Funding service ready"
        );

        Ok(Self::new(chain, gas_station, funder, ceiling))
    }

    /// Transfer `request.value` from the funder to `request.destination`.
    pub async fn send_funds(&self, request: FundingRequest) -> FundingResult<TransactionHandle> {
        let result = self.try_send_funds(request).await;
        match &result {
            Ok(handle) => {
                metrics::record_funding_request("success");
                metrics::record_funded_value(handle.value);
            }
            Err(e) => {
                metrics::record_funding_request(e.kind());
                tracing::warn!(error = %e, kind = e.kind(), "Funding failed");
            }
        }
        result
    }

    async fn try_send_funds(&self, request: FundingRequest) -> FundingResult<TransactionHandle> {
        self.ceiling.check(request.value)?;

        let gas_price = self.resolve_gas_price(request.gas_price).await?;

        tracing::info!(
            to = %request.destination,
            value = %request.value,
            gas_price = gas_price,
            gas_limit = request.gas_limit,
            block = %request.block,
            max_attempts = request.retry.max_attempts,
            "Sending funds"
        );

        let handle = self
            .chain
            .send_value(SendValue {
                signer: self.funder.clone(),
                to: request.destination,
                gas_price,
                value: request.value,
                gas_limit: request.gas_limit,
                retry: request.retry,
                block: request.block,
                max_value: self.ceiling.wei(),
            })
            .await?;

        Ok(handle)
    }

    /// The override when given and non-zero, otherwise the oracle's current
    /// standard tier.
    pub async fn resolve_gas_price(&self, explicit: Option<u128>) -> FundingResult<u128> {
        match explicit {
            Some(price) if price > 0 => Ok(price),
            _ => Ok(self.gas_prices().await?.standard),
        }
    }

    /// Current gas price tiers from the oracle.
    pub async fn gas_prices(&self) -> FundingResult<GasPrices> {
        Ok(self.gas_station.get_gas_prices().await?)
    }

    /// Funder balance in wei.
    pub async fn funder_balance(&self) -> FundingResult<U256> {
        Ok(self.chain.balance_of(self.funder.address()).await?)
    }

    pub fn funder_address(&self) -> Address {
        self.funder.address()
    }

    pub fn spend_ceiling(&self) -> SpendCeiling {
        self.ceiling
    }
}

impl std::fmt::Debug for FundingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingService")
            .field("funder", &self.funder.address())
            .field("ceiling", &self.ceiling)
            .finish()
    }
}
