//! Stub collaborators and a mock JSON-RPC node for funding tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{hex, keccak256, Address, TxHash, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use safe_funder::blockchain::{
    BlockchainClient, BlockchainConfig, BlockchainError, BlockchainResult, ChainClient,
    RpcChainClient, SendValue, TransactionHandle, Wallet,
};
use safe_funder::gas_station::{GasPrices, GasStation, GasStationError, GasStationResult};
use safe_funder::funding::SpendCeiling;
use safe_funder::FundingService;

/// Anvil's first account. Publicly known; never holds real funds.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap()
}

/// Gas station returning a fixed standard tier and counting queries.
pub struct StubGasStation {
    standard: Mutex<u128>,
    fail: bool,
    calls: AtomicU32,
}

impl StubGasStation {
    pub fn with_standard(standard: u128) -> Arc<Self> {
        Arc::new(Self {
            standard: Mutex::new(standard),
            fail: false,
            calls: AtomicU32::new(0),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            standard: Mutex::new(0),
            fail: true,
            calls: AtomicU32::new(0),
        })
    }

    pub fn set_standard(&self, standard: u128) {
        *self.standard.lock().unwrap() = standard;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GasStation for StubGasStation {
    async fn get_gas_prices(&self) -> GasStationResult<GasPrices> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GasStationError::Unavailable("stub oracle down".to_string()));
        }
        let standard = *self.standard.lock().unwrap();
        Ok(GasPrices {
            lowest: standard / 2,
            safe_low: standard,
            standard,
            fast: standard * 2,
            fastest: standard * 3,
            last_update: 0,
        })
    }
}

/// What the stub chain client should do when called.
pub enum ChainBehaviour {
    Succeed,
    Reject(String),
}

/// Chain client recording every submission it receives.
pub struct RecordingChainClient {
    behaviour: ChainBehaviour,
    calls: Mutex<Vec<SendValue>>,
    pub balance: U256,
}

impl RecordingChainClient {
    pub fn succeeding() -> Arc<Self> {
        Self::with(ChainBehaviour::Succeed)
    }

    pub fn rejecting(reason: &str) -> Arc<Self> {
        Self::with(ChainBehaviour::Reject(reason.to_string()))
    }

    fn with(behaviour: ChainBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
            balance: U256::from(42u64),
        })
    }

    pub fn calls(&self) -> Vec<SendValue> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for RecordingChainClient {
    async fn send_value(&self, request: SendValue) -> BlockchainResult<TransactionHandle> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.behaviour {
            ChainBehaviour::Succeed => Ok(TransactionHandle {
                tx_hash: TxHash::repeat_byte(0xab),
                from: request.signer.address(),
                to: request.to,
                value: request.value,
                nonce: 0,
                gas_price: request.gas_price,
                gas_limit: request.gas_limit,
                attempts: 1,
            }),
            ChainBehaviour::Reject(reason) => Err(BlockchainError::Broadcast(reason.clone())),
        }
    }

    async fn balance_of(&self, _address: Address) -> BlockchainResult<U256> {
        Ok(self.balance)
    }
}

/// Funding service over stubs with a ceiling in wei.
pub fn service(
    chain: &Arc<RecordingChainClient>,
    gas_station: &Arc<StubGasStation>,
    ceiling_wei: u64,
) -> FundingService {
    FundingService::new(
        chain.clone(),
        gas_station.clone(),
        test_wallet(),
        SpendCeiling::from_wei(U256::from(ceiling_wei)),
    )
}

/// A valid, non-zero destination.
pub fn destination() -> Address {
    Address::repeat_byte(0x42)
}

/// How the mock node answers one `eth_sendRawTransaction` it has not seen.
#[derive(Debug, Clone)]
pub enum SendBehaviour {
    /// Pool the transaction and answer with its hash.
    Accept,
    /// Pool the transaction, then answer only after the delay.
    AcceptSlowly(Duration),
    /// Mine the transaction, then answer only after the delay.
    MineSlowly(Duration),
    /// Another transaction takes the current nonce first.
    NonceTaken,
    /// Refuse with a JSON-RPC error carrying this message.
    Reject(&'static str),
}

#[derive(Default)]
struct NodeState {
    nonce: u64,
    script: VecDeque<SendBehaviour>,
    pooled: Vec<String>,
    mined: Vec<String>,
    send_calls: u32,
}

/// Minimal JSON-RPC node over HTTP answering the calls a value transfer needs.
pub struct MockNode {
    pub url: String,
    state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    /// Start a node on an ephemeral port whose funder nonce is `nonce`.
    ///
    /// Broadcasts consume `script` in order; once it is empty they are accepted.
    pub async fn start(nonce: u64, script: Vec<SendBehaviour>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(NodeState {
            nonce,
            script: script.into(),
            ..Default::default()
        }));

        let shared = state.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_connection(socket, shared.clone()));
            }
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn chain_client(&self, rpc_timeout_secs: u64) -> RpcChainClient {
        let config = BlockchainConfig {
            rpc_url: self.url.clone(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs,
        };
        RpcChainClient::new(BlockchainClient::new(config).unwrap())
    }

    /// Raw transactions the node took in, pooled or mined.
    pub fn accepted(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.pooled.iter().chain(state.mined.iter()).cloned().collect()
    }

    /// Number of `eth_sendRawTransaction` calls received.
    pub fn send_calls(&self) -> u32 {
        self.state.lock().unwrap().send_calls
    }

    pub fn nonce(&self) -> u64 {
        self.state.lock().unwrap().nonce
    }
}

/// Hash of a raw transaction as the node reports it.
pub fn raw_tx_hash(raw: &str) -> TxHash {
    keccak256(hex::decode(raw).unwrap())
}

async fn serve_connection(mut socket: TcpStream, state: Arc<Mutex<NodeState>>) {
    let Some(body) = read_body(&mut socket).await else {
        return;
    };
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return;
    };

    let id = request["id"].clone();
    let outcome = answer(&request, &state).await;
    let payload = match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message },
        }),
    };

    let body = payload.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let start = end + 4;
            while buf.len() < start + length {
                let n = socket.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return Some(buf[start..start + length].to_vec());
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

async fn answer(request: &Value, state: &Mutex<NodeState>) -> Result<Value, String> {
    match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => Ok(json!("0x7a69")),
        "eth_getTransactionCount" => {
            let nonce = state.lock().unwrap().nonce;
            Ok(json!(format!("0x{:x}", nonce)))
        }
        "eth_sendRawTransaction" => {
            let raw = request["params"][0].as_str().unwrap_or_default().to_string();
            let (behaviour, reply) = {
                let mut node = state.lock().unwrap();
                node.send_calls += 1;
                if node.mined.contains(&raw) {
                    return Err(format!("nonce too low: next nonce {}", node.nonce));
                }
                if node.pooled.contains(&raw) {
                    return Err("already known".to_string());
                }
                let behaviour = node.script.pop_front().unwrap_or(SendBehaviour::Accept);
                let reply = match &behaviour {
                    SendBehaviour::Accept | SendBehaviour::AcceptSlowly(_) => {
                        node.pooled.push(raw.clone());
                        node.nonce += 1;
                        Ok(json!(raw_tx_hash(&raw)))
                    }
                    SendBehaviour::MineSlowly(_) => {
                        node.mined.push(raw.clone());
                        node.nonce += 1;
                        Ok(json!(raw_tx_hash(&raw)))
                    }
                    SendBehaviour::NonceTaken => {
                        node.nonce += 1;
                        Err(format!("nonce too low: next nonce {}", node.nonce))
                    }
                    SendBehaviour::Reject(message) => Err(message.to_string()),
                };
                (behaviour, reply)
            };
            if let SendBehaviour::AcceptSlowly(delay) | SendBehaviour::MineSlowly(delay) = behaviour {
                tokio::time::sleep(delay).await;
            }
            reply
        }
        other => Err(format!("method {} not supported", other)),
    }
}
