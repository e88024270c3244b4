//! Value transfer submission.
//!
//! # Responsibilities
//! - Enforce the per-transfer value maximum before anything is signed
//! - Read the funder nonce at the requested block reference
//! - Build, sign and broadcast legacy value transfers
//! - Retry nonce conflicts and transport failures per the caller's policy
//!
//! Submissions through one [`RpcChainClient`] are serialised: the nonce read
//! and the broadcast happen under a single lock, so concurrent callers
//! sharing the funder account never sign with the same nonce.
//!
//! A transfer is signed once per nonce. A broadcast that fails in transport
//! may still have reached a node, so a retry resends the identical bytes
//! instead of signing a second transfer.

use std::sync::Arc;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{keccak256, Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{
    BlockReference, BlockchainError, BlockchainResult, TransactionHandle,
};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;
use crate::resilience::{retry_with_backoff, RetryPolicy};

/// Everything needed to submit one value transfer.
#[derive(Debug, Clone)]
pub struct SendValue {
    /// Account that signs and pays.
    pub signer: Wallet,
    pub to: Address,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Value in wei.
    pub value: U256,
    pub gas_limit: u64,
    pub retry: RetryPolicy,
    /// State the nonce is read from.
    pub block: BlockReference,
    /// Largest value this transfer may carry.
    pub max_value: U256,
}

/// Chain access needed by the funding service.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Sign and broadcast a value transfer.
    ///
    /// Fails with [`BlockchainError::ValueExceedsMaximum`] without
    /// broadcasting when `value > max_value`.
    async fn send_value(&self, request: SendValue) -> BlockchainResult<TransactionHandle>;

    /// Current balance of `address` in wei.
    async fn balance_of(&self, address: Address) -> BlockchainResult<U256>;
}

/// [`ChainClient`] backed by JSON-RPC providers.
#[derive(Clone)]
pub struct RpcChainClient {
    client: BlockchainClient,
    submission_lock: Arc<Mutex<()>>,
}

impl RpcChainClient {
    pub fn new(client: BlockchainClient) -> Self {
        Self {
            client,
            submission_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read the funder nonce at the request's block and sign the transfer.
    async fn sign_transfer(
        &self,
        request: &SendValue,
        wallet: &EthereumWallet,
    ) -> BlockchainResult<SignedTransfer> {
        let from = request.signer.address();
        let nonce = self
            .client
            .get_transaction_count_at(from, request.block.into())
            .await?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(request.to)
            .with_value(request.value)
            .with_nonce(nonce)
            .with_gas_price(request.gas_price)
            .with_gas_limit(request.gas_limit)
            .with_chain_id(request.signer.chain_id());

        let envelope = <TransactionRequest as TransactionBuilder<Ethereum>>::build(tx, wallet)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Failed to sign transaction: {}", e)))?;
        let encoded = envelope.encoded_2718();

        Ok(SignedTransfer {
            nonce,
            tx_hash: keccak256(&encoded),
            encoded,
            maybe_sent: false,
        })
    }

    /// One broadcast attempt.
    ///
    /// `pending` carries the signed transfer between attempts. It is kept
    /// after a transport failure so the next attempt resends the same bytes,
    /// and cleared after a nonce conflict so the next attempt re-signs at a
    /// fresh nonce.
    async fn submit_once(
        &self,
        request: &SendValue,
        wallet: &EthereumWallet,
        pending: &Mutex<Option<SignedTransfer>>,
    ) -> BlockchainResult<(TxHash, u64)> {
        let mut slot = pending.lock().await;
        let transfer = match slot.take() {
            Some(transfer) => transfer,
            None => self.sign_transfer(request, wallet).await?,
        };

        match self.client.send_raw_transaction(&transfer.encoded).await {
            Ok(tx_hash) => Ok((tx_hash, transfer.nonce)),
            Err(BlockchainError::AlreadyKnown(_)) => Ok((transfer.tx_hash, transfer.nonce)),
            Err(BlockchainError::NonceConflict(message)) if transfer.maybe_sent => {
                // An earlier broadcast of these bytes got no answer; the nonce
                // moving on is taken as that broadcast having landed.
                tracing::warn!(
                    tx_hash = %transfer.tx_hash,
                    nonce = transfer.nonce,
                    error = %message,
                    "Nonce consumed after unconfirmed broadcast, assuming it was this transfer"
                );
                Ok((transfer.tx_hash, transfer.nonce))
            }
            Err(e @ (BlockchainError::Rpc(_) | BlockchainError::Timeout(_))) => {
                *slot = Some(SignedTransfer {
                    maybe_sent: true,
                    ..transfer
                });
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

/// A transfer signed once at a fixed nonce.
#[derive(Debug, Clone)]
struct SignedTransfer {
    nonce: u64,
    tx_hash: TxHash,
    encoded: Vec<u8>,
    /// A broadcast of these bytes ended without an answer from any node.
    maybe_sent: bool,
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn send_value(&self, request: SendValue) -> BlockchainResult<TransactionHandle> {
        if request.value > request.max_value {
            return Err(BlockchainError::ValueExceedsMaximum {
                value: request.value,
                max_value: request.max_value,
            });
        }

        let wallet = request.signer.ethereum_wallet();
        let _guard = self.submission_lock.lock().await;
        let pending = Mutex::new(None);

        let (result, attempts) = retry_with_backoff(
            &request.retry,
            "send_value",
            BlockchainError::is_retryable,
            |_| self.submit_once(&request, &wallet, &pending),
        )
        .await;
        metrics::record_submission_attempts(attempts);

        match result {
            Ok((tx_hash, nonce)) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    from = %request.signer.address(),
                    to = %request.to,
                    value = %request.value,
                    nonce = nonce,
                    attempts = attempts,
                    "Value transfer broadcast"
                );
                Ok(TransactionHandle {
                    tx_hash,
                    from: request.signer.address(),
                    to: request.to,
                    value: request.value,
                    nonce,
                    gas_price: request.gas_price,
                    gas_limit: request.gas_limit,
                    attempts,
                })
            }
            Err(e) => {
                if let Some(unconfirmed) = pending.into_inner() {
                    tracing::warn!(
                        tx_hash = %unconfirmed.tx_hash,
                        nonce = unconfirmed.nonce,
                        "Giving up on a broadcast that may still be pending"
                    );
                }
                if attempts > 1 && e.is_retryable() {
                    Err(BlockchainError::RetriesExhausted {
                        attempts,
                        last_error: e.to_string(),
                    })
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn balance_of(&self, address: Address) -> BlockchainResult<U256> {
        self.client.get_balance(address).await
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("client", &self.client)
            .finish()
    }
}
