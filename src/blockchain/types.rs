//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Node error fragments that mean the nonce we signed with is already taken.
const NONCE_CONFLICT_MARKERS: [&str; 2] = ["nonce too low", "replacement transaction underpriced"];

/// Node error fragments that mean these exact signed bytes are already pooled.
const ALREADY_KNOWN_MARKERS: [&str; 2] = ["already known", "known transaction"];

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The node already holds this exact signed transaction.
    #[error("Transaction already known: {0}")]
    AlreadyKnown(String),

    /// The node rejected the transaction because its nonce is taken.
    #[error("Nonce conflict: {0}")]
    NonceConflict(String),

    /// The node rejected the transaction for any other reason.
    #[error("Broadcast rejected: {0}")]
    Broadcast(String),

    /// Every allowed attempt failed.
    #[error("Submission failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Value exceeds the maximum a single transfer may carry.
    #[error("Value {value} wei exceeds maximum of {max_value} wei")]
    ValueExceedsMaximum { value: U256, max_value: U256 },

    /// Unparseable block reference.
    #[error("Invalid block reference '{0}'")]
    InvalidBlockReference(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl BlockchainError {
    /// Classify a JSON-RPC error message returned by a node on broadcast.
    pub fn from_rejection(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if ALREADY_KNOWN_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::AlreadyKnown(message)
        } else if NONCE_CONFLICT_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::NonceConflict(message)
        } else {
            Self::Broadcast(message)
        }
    }

    /// Whether another submission attempt could succeed.
    ///
    /// Nonce conflicts are resolved by re-reading the nonce; transport
    /// failures may be transient. Rejections such as insufficient funds are
    /// final, and `AlreadyKnown` is not a failure at all.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NonceConflict(_) | Self::Rpc(_) | Self::Timeout(_)
        )
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Which chain state a nonce or balance read is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockReference {
    /// Include transactions still in the mempool.
    #[default]
    Pending,
    /// The most recent mined block.
    Latest,
    /// A specific block height.
    Number(u64),
}

impl FromStr for BlockReference {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => return Ok(Self::Pending),
            "latest" => return Ok(Self::Latest),
            _ => {}
        }
        let parsed = match trimmed.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(Self::Number)
            .map_err(|_| BlockchainError::InvalidBlockReference(s.to_string()))
    }
}

impl fmt::Display for BlockReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Latest => write!(f, "latest"),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<BlockReference> for BlockId {
    fn from(reference: BlockReference) -> Self {
        match reference {
            BlockReference::Pending => BlockId::Number(BlockNumberOrTag::Pending),
            BlockReference::Latest => BlockId::Number(BlockNumberOrTag::Latest),
            BlockReference::Number(n) => BlockId::Number(BlockNumberOrTag::Number(n)),
        }
    }
}

/// A broadcast value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionHandle {
    /// Hash of the signed transaction.
    pub tx_hash: TxHash,
    /// Funder account that signed it.
    pub from: Address,
    /// Destination of the value.
    pub to: Address,
    /// Value transferred in wei.
    pub value: U256,
    /// Nonce the transaction was signed with.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Submission attempts made, including the successful one.
    pub attempts: u32,
}
