//! Funding request types, spend ceiling and error taxonomy.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::blockchain::types::{BlockReference, BlockchainError};
use crate::gas_station::GasStationError;
use crate::resilience::RetryPolicy;

/// Errors surfaced by the funding service.
#[derive(Debug, Error)]
pub enum FundingError {
    /// Malformed or unusable destination address.
    #[error("Invalid destination '{address}': {reason}")]
    InvalidDestination { address: String, reason: String },

    /// No gas price override was given and the oracle could not answer.
    #[error("Gas price oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Requested value is over the configured spend ceiling.
    #[error("Value {value} wei exceeds spend ceiling of {ceiling} wei")]
    ExceedsSpendCeiling { value: U256, ceiling: U256 },

    /// The transfer could not be broadcast.
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// Configuration could not produce a service.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Funder key missing or unusable.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl FundingError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDestination { .. } => "invalid_destination",
            Self::OracleUnavailable(_) => "oracle_unavailable",
            Self::ExceedsSpendCeiling { .. } => "exceeds_spend_ceiling",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::Configuration(_) => "configuration",
            Self::Wallet(_) => "wallet",
        }
    }

    fn invalid_destination(address: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<BlockchainError> for FundingError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::ValueExceedsMaximum { value, max_value } => {
                Self::ExceedsSpendCeiling {
                    value,
                    ceiling: max_value,
                }
            }
            BlockchainError::Wallet(msg) => Self::Wallet(msg),
            other => Self::SubmissionFailed(other.to_string()),
        }
    }
}

impl From<GasStationError> for FundingError {
    fn from(err: GasStationError) -> Self {
        match err {
            GasStationError::Unavailable(msg) => Self::OracleUnavailable(msg),
        }
    }
}

/// Result type for funding operations.
pub type FundingResult<T> = Result<T, FundingError>;

/// Upper bound on the value of a single funding call, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendCeiling(U256);

impl SpendCeiling {
    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Parse a decimal ether amount such as `"0.1"`.
    pub fn from_ether(ether: &str) -> FundingResult<Self> {
        parse_ether(ether.trim()).map(Self).map_err(|e| {
            FundingError::Configuration(format!("invalid spend ceiling '{}': {}", ether, e))
        })
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    /// Whether a transfer of `value` is allowed. Equal to the ceiling is allowed.
    pub fn permits(&self, value: U256) -> bool {
        value <= self.0
    }

    /// Fail with [`FundingError::ExceedsSpendCeiling`] when `value` is over.
    pub fn check(&self, value: U256) -> FundingResult<()> {
        if self.permits(value) {
            Ok(())
        } else {
            Err(FundingError::ExceedsSpendCeiling {
                value,
                ceiling: self.0,
            })
        }
    }
}

impl fmt::Display for SpendCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", format_ether(self.0))
    }
}

/// Parse a destination address.
///
/// Accepts `0x` followed by 40 hex digits. Mixed-case input must be a valid
/// EIP-55 checksum; all-lowercase and all-uppercase input is taken as is.
/// The zero address is refused.
pub fn parse_destination(input: &str) -> FundingResult<Address> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| FundingError::invalid_destination(input, "missing 0x prefix"))?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FundingError::invalid_destination(
            input,
            "expected 40 hexadecimal characters",
        ));
    }

    let mixed_case = hex.chars().any(|c| c.is_ascii_lowercase())
        && hex.chars().any(|c| c.is_ascii_uppercase());
    let normalized = format!("0x{}", hex);
    let address = if mixed_case {
        Address::parse_checksummed(&normalized, None)
            .map_err(|_| FundingError::invalid_destination(input, "invalid EIP-55 checksum"))?
    } else {
        Address::from_str(&normalized)
            .map_err(|e| FundingError::invalid_destination(input, e.to_string()))?
    };

    if address == Address::ZERO {
        return Err(FundingError::invalid_destination(input, "zero address"));
    }
    Ok(address)
}

/// One funding call. Built per invocation, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRequest {
    pub destination: Address,
    /// Value in wei.
    pub value: U256,
    pub gas_limit: u64,
    /// Explicit gas price in wei; the oracle's standard tier when `None`.
    pub gas_price: Option<u128>,
    pub retry: RetryPolicy,
    pub block: BlockReference,
}

impl FundingRequest {
    /// Gas limit used when none is given.
    pub const DEFAULT_GAS_LIMIT: u64 = 22_000;

    pub fn new(destination: Address, value: U256) -> Self {
        Self {
            destination,
            value,
            gas_limit: Self::DEFAULT_GAS_LIMIT,
            gas_price: None,
            retry: RetryPolicy::none(),
            block: BlockReference::Pending,
        }
    }

    /// Build a request from an unparsed destination.
    pub fn to(destination: &str, value: U256) -> FundingResult<Self> {
        Ok(Self::new(parse_destination(destination)?, value))
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Fixed gas price in wei. Zero leaves the choice to the oracle.
    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_block(mut self, block: BlockReference) -> Self {
        self.block = block;
        self
    }
}
