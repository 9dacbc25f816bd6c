//! Transaction building, signing, and submission for plain value transfers.
//!
//! # Responsibilities
//! - Fetch nonce, gas price, and chain id fresh for every transfer
//! - Build a legacy envelope with the fixed transfer gas limit
//! - Sign with EIP-155 replay protection and broadcast

use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

use crate::blockchain::client::{ChainApi, ChainClient};
use crate::blockchain::types::{parse_address, BlockchainError, BlockchainResult};
use crate::registry::NetworkRegistry;

/// Gas consumed by a value transfer with no calldata.
///
/// Only valid while transfers are the sole supported transaction kind.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Errors from the end-to-end transfer workflow.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The request itself is malformed; nothing was sent to the node.
    #[error("invalid transfer: {0}")]
    Validation(String),

    /// The network name is not registered.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// Connecting, querying, signing, or submitting failed.
    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Parse a base-10 amount of wei as given on the command line.
pub fn parse_amount(raw: &str) -> Result<i64, TransferError> {
    raw.trim().parse::<i64>().map_err(|e| {
        TransferError::Validation(format!("amount '{}' is not a 64-bit integer: {}", raw, e))
    })
}

/// Reject negative amounts before they reach the signer.
pub fn validate_amount(amount: i64) -> Result<U256, TransferError> {
    u64::try_from(amount).map(U256::from).map_err(|_| {
        TransferError::Validation(format!("amount must not be negative, got {}", amount))
    })
}

/// Transaction builder bound to one chain connection and one sender.
pub struct TxBuilder<'a, C> {
    client: &'a C,
    signer: PrivateKeySigner,
}

impl<'a, C: ChainApi> TxBuilder<'a, C> {
    /// Create a new transaction builder.
    pub fn new(client: &'a C, signer: PrivateKeySigner) -> Self {
        Self { client, signer }
    }

    /// Sender address derived from the signing key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Build an unsigned transfer with freshly fetched network parameters.
    ///
    /// # Arguments
    /// * `to` - Destination address
    /// * `value` - Amount in wei
    pub async fn build(&self, to: Address, value: U256) -> BlockchainResult<TransactionRequest> {
        let nonce = self.client.pending_nonce(self.address()).await?;
        let gas_price = self.client.gas_price().await?;
        let chain_id = self.client.chain_id().await?;

        tracing::debug!(
            from = %self.address(),
            nonce,
            gas_price,
            chain_id = %chain_id,
            "Fetched transfer parameters"
        );

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_input(Bytes::new())
            .with_nonce(nonce)
            .with_gas_price(gas_price)
            .with_chain_id(chain_id.0)
            .with_gas_limit(TRANSFER_GAS_LIMIT);

        Ok(tx)
    }

    /// Sign `tx` and return the raw EIP-2718 bytes with their hash.
    pub async fn sign(&self, tx: TransactionRequest) -> BlockchainResult<(TxHash, Vec<u8>)> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok((*envelope.tx_hash(), envelope.encoded_2718()))
    }

    /// Build, sign, and broadcast a transfer; returns the transaction hash.
    pub async fn send(&self, to: Address, value: U256) -> BlockchainResult<TxHash> {
        let tx = self.build(to, value).await?;
        let (local_hash, raw) = self.sign(tx).await?;
        let tx_hash = self.client.send_raw_transaction(&raw).await?;

        if tx_hash != local_hash {
            tracing::warn!(
                local = %local_hash,
                remote = %tx_hash,
                "Node reported a different transaction hash"
            );
        }

        tracing::info!(
            tx_hash = %tx_hash,
            from = %self.address(),
            to = %to,
            value = %value,
            "Transaction submitted"
        );
        Ok(tx_hash)
    }
}

/// Send `amount` wei from `signer` to `to` on the named network.
///
/// Validation happens before any connection is opened; every later failure
/// aborts the transfer with nothing submitted.
pub async fn build_and_send(
    networks: &NetworkRegistry,
    rpc_timeout: Duration,
    network: &str,
    signer: PrivateKeySigner,
    to: &str,
    amount: i64,
) -> Result<TxHash, TransferError> {
    let value = validate_amount(amount)?;
    let to = parse_address(to).map_err(|e| TransferError::Validation(e.to_string()))?;

    let endpoint = networks
        .resolve(network)
        .ok_or_else(|| TransferError::UnknownNetwork(network.to_string()))?;

    let client = ChainClient::connect(endpoint, rpc_timeout).await?;
    let tx_hash = TxBuilder::new(&client, signer).send(to, value).await?;
    Ok(tx_hash)
}
