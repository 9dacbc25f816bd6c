//! Shared utilities for integration testing: an in-process JSON-RPC node.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::hex;
use alloy::primitives::{keccak256, Address, B256, U256};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Chain state served by the mock node.
#[derive(Debug, Default)]
pub struct NodeState {
    pub chain_id: u64,
    pub block_number: u64,
    pub gas_price: u128,
    /// Pending nonce handed out by `eth_getTransactionCount`; advanced on every accepted send.
    pub nonce: u64,
    pub balances: HashMap<Address, U256>,
    pub receipts: HashMap<B256, Value>,
    /// Raw transactions accepted by `eth_sendRawTransaction`.
    pub sent: Vec<Vec<u8>>,
    /// Reject every `eth_sendRawTransaction` with this message.
    pub reject_with: Option<String>,
    /// Answer `eth_chainId` with an error.
    pub fail_chain_id: bool,
    /// Accept requests but never reply.
    pub stall: bool,
    /// Every method called, in order.
    pub calls: Vec<String>,
    /// Block tags passed to `eth_getTransactionCount`.
    pub nonce_tags: Vec<String>,
}

impl NodeState {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            gas_price: 1_000_000_000,
            ..Default::default()
        }
    }
}

/// A running mock node.
pub struct MockNode {
    pub url: String,
    pub state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    /// Decoded transactions accepted so far.
    pub fn sent_transactions(&self) -> Vec<TxEnvelope> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap())
            .collect()
    }

    /// How many times `method` was called.
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }
}

/// Start a mock JSON-RPC node on an ephemeral port.
pub async fn start_mock_node(state: NodeState) -> MockNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(Mutex::new(state));
    let shared = state.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let state = shared.clone();
                    tokio::spawn(async move {
                        let _ = handle_connection(socket, state).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockNode {
        url: format!("http://{}", addr),
        state,
    }
}

/// A receipt in the shape `eth_getTransactionReceipt` returns.
pub fn receipt_json(
    tx_hash: B256,
    from: Address,
    to: Address,
    block_number: u64,
    success: bool,
) -> Value {
    let status = if success { "0x1" } else { "0x0" };
    json!({
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{:#x}", block_number),
        "from": from,
        "to": to,
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "type": "0x0",
        "status": status,
    })
}

async fn handle_connection(
    mut socket: TcpStream,
    state: Arc<Mutex<NodeState>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let body = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() >= body_start + content_length {
            break buf[body_start..body_start + content_length].to_vec();
        }
    };

    let stall = state.lock().unwrap().stall;
    if stall {
        std::future::pending::<()>().await;
    }

    let request: Value = serde_json::from_slice(&body)?;
    let response = match request {
        Value::Array(calls) => {
            Value::Array(calls.iter().map(|call| dispatch(call, &state)).collect())
        }
        call => dispatch(&call, &state),
    };

    let payload = response.to_string();
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    socket.write_all(reply.as_bytes()).await?;
    socket.shutdown().await
}

fn dispatch(call: &Value, state: &Mutex<NodeState>) -> Value {
    let id = call["id"].clone();
    let method = call["method"].as_str().unwrap_or_default();
    let params = &call["params"];

    let mut node = state.lock().unwrap();
    node.calls.push(method.to_string());

    let outcome: Result<Value, String> = match method {
        "eth_chainId" if node.fail_chain_id => Err("chain id unavailable".into()),
        "eth_chainId" => Ok(json!(format!("{:#x}", node.chain_id))),
        "eth_blockNumber" => Ok(json!(format!("{:#x}", node.block_number))),
        "eth_gasPrice" => Ok(json!(format!("{:#x}", node.gas_price))),
        "eth_getBalance" => {
            let address: Address = params[0]
                .as_str()
                .unwrap_or_default()
                .parse()
                .unwrap_or_default();
            Ok(json!(node.balances.get(&address).copied().unwrap_or_default()))
        }
        "eth_getTransactionCount" => {
            let tag = params[1].as_str().unwrap_or("latest").to_string();
            node.nonce_tags.push(tag);
            Ok(json!(format!("{:#x}", node.nonce)))
        }
        "eth_sendRawTransaction" => match node.reject_with.clone() {
            Some(reason) => Err(reason),
            None => {
                let raw = hex::decode(params[0].as_str().unwrap_or_default()).unwrap_or_default();
                let hash = keccak256(&raw);
                node.sent.push(raw);
                node.nonce += 1;
                Ok(json!(hash))
            }
        },
        "eth_getTransactionReceipt" => {
            let hash: B256 = params[0].as_str().unwrap_or_default().parse().unwrap_or_default();
            Ok(node.receipts.get(&hash).cloned().unwrap_or(Value::Null))
        }
        other => Err(format!("method {} not supported", other)),
    };

    match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message },
        }),
    }
}
