//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (funder private key) + [blockchain] config
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (maximum check, nonce, sign, broadcast, retry)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::{ChainClient, RpcChainClient, SendValue};
pub use types::{
    BlockReference, BlockchainConfig, BlockchainError, BlockchainResult, ChainId,
    TransactionHandle,
};
pub use wallet::Wallet;
