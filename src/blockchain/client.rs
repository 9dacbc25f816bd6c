//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint (HTTP or WebSocket)
//! - Verify liveness at connect time via `eth_chainId`
//! - Query chain state (block number, balances, nonces, gas price, receipts)
//! - Broadcast pre-signed transactions

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::TransportResult;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Chain operations the transfer workflow and commands depend on.
///
/// [`ChainClient`] is the production implementation.
#[allow(async_fn_in_trait)]
pub trait ChainApi {
    /// `eth_chainId`.
    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// `eth_blockNumber`.
    async fn block_number(&self) -> BlockchainResult<u64>;

    /// `eth_getBalance` at the latest block, in wei.
    async fn balance(&self, address: Address) -> BlockchainResult<U256>;

    /// `eth_getTransactionCount` against the pending block, so sequential
    /// sends from one address see each other.
    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// `eth_gasPrice`, in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// `eth_sendRawTransaction`.
    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash>;

    /// `eth_getTransactionReceipt`; a null result is [`BlockchainError::ReceiptNotFound`].
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt>;
}

/// A live connection to one RPC endpoint for the duration of a command.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Connect to `endpoint` and confirm it answers `eth_chainId`.
    ///
    /// # Arguments
    /// * `endpoint` - `http(s)://` or `ws(s)://` URL
    /// * `timeout_duration` - Bound applied to every RPC call
    pub async fn connect(endpoint: &str, timeout_duration: Duration) -> BlockchainResult<Self> {
        let connection_error = |reason: String| BlockchainError::Connection {
            url: endpoint.to_string(),
            reason,
        };

        let url: Url = endpoint
            .parse()
            .map_err(|e| connection_error(format!("invalid URL: {}", e)))?;

        let scheme = url.scheme().to_string();
        let provider: Arc<dyn Provider + Send + Sync> = match scheme.as_str() {
            "http" | "https" => Arc::new(
                ProviderBuilder::new()
                    .disable_recommended_fillers()
                    .connect_http(url),
            ) as Arc<dyn Provider + Send + Sync>,
            "ws" | "wss" => {
                let ws = ProviderBuilder::new()
                    .disable_recommended_fillers()
                    .connect_ws(WsConnect::new(url.as_str()));
                match timeout(timeout_duration, ws).await {
                    Ok(Ok(provider)) => Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
                    Ok(Err(e)) => return Err(connection_error(e.to_string())),
                    Err(_) => return Err(connection_error("websocket handshake timed out".into())),
                }
            }
            other => {
                return Err(connection_error(format!("unsupported scheme '{}'", other)));
            }
        };

        let client = Self {
            provider,
            endpoint: endpoint.to_string(),
            timeout_duration,
        };

        // Liveness check: an endpoint that cannot report its chain is unusable.
        let chain_id = client
            .chain_id()
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        tracing::info!(endpoint = %endpoint, chain_id = %chain_id, "Connected to node");
        Ok(client)
    }

    /// The endpoint this client is connected to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T, F>(&self, query: &'static str, request: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, request).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.endpoint, query, error = %e, "RPC error");
                Err(BlockchainError::Query {
                    query,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(endpoint = %self.endpoint, query, "RPC timeout");
                Err(BlockchainError::Timeout {
                    query,
                    secs: self.timeout_duration.as_secs(),
                })
            }
        }
    }
}

impl ChainApi for ChainClient {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("chain id", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.call("block number", self.provider.get_block_number())
            .await
    }

    async fn balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("balance", self.provider.get_balance(address)).await
    }

    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.call(
            "pending nonce",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.call("gas price", self.provider.get_gas_price()).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        match timeout(self.timeout_duration, self.provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Transaction rejected");
                Err(BlockchainError::Submission(e.to_string()))
            }
            Err(_) => Err(BlockchainError::Timeout {
                query: "send raw transaction",
                secs: self.timeout_duration.as_secs(),
            }),
        }
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        self.call(
            "transaction receipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await?
        .ok_or(BlockchainError::ReceiptNotFound(tx_hash))
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
