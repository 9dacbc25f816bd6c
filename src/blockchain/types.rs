//! Chain-specific types, parsing helpers, and error definitions.

use std::fmt;

use alloy::primitives::hex;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::rpc::types::TransactionReceipt;
use thiserror::Error;

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

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Endpoint is malformed, unreachable, or failed the chain-id liveness check.
    #[error("cannot connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    /// An RPC query failed; `query` names which one.
    #[error("{query} query failed: {reason}")]
    Query { query: &'static str, reason: String },

    /// An RPC request timed out.
    #[error("{query} timed out after {secs} seconds")]
    Timeout { query: &'static str, secs: u64 },

    /// The node rejected a signed transaction.
    #[error("transaction rejected by node: {0}")]
    Submission(String),

    /// The transaction is unknown or not mined yet.
    #[error("receipt not found for transaction {0}")]
    ReceiptNotFound(TxHash),

    /// The transaction hash could not be decoded.
    #[error("malformed transaction hash '{0}': expected 32 bytes of hex")]
    MalformedHash(String),

    /// The address could not be decoded.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// Building or signing the transaction envelope failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Parse an address, ignoring checksum casing.
pub fn parse_address(raw: &str) -> BlockchainResult<Address> {
    raw.trim()
        .parse()
        .map_err(|_| BlockchainError::InvalidAddress(raw.to_string()))
}

/// Parse a transaction hash, with or without the `0x` prefix.
///
/// Fails before any network call when the input is not exactly 32 bytes of hex.
pub fn parse_tx_hash(raw: &str) -> BlockchainResult<TxHash> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits).map_err(|_| BlockchainError::MalformedHash(raw.to_string()))?;
    if bytes.len() != 32 {
        return Err(BlockchainError::MalformedHash(raw.to_string()));
    }
    Ok(B256::from_slice(&bytes))
}

/// Render a wei amount as a decimal ether string without trailing zeros.
///
/// Exact for the whole `U256` range: `1_500_000_000_000_000_000` → `"1.5"`.
pub fn format_balance(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}

/// The receipt fields shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    /// `true` if the transaction executed successfully.
    pub status: bool,
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub from: Address,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
}

impl From<&TransactionReceipt> for ReceiptSummary {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            status: receipt.status(),
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            from: receipt.from,
            to: receipt.to,
            contract_address: receipt.contract_address,
        }
    }
}

impl fmt::Display for ReceiptSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction: {}", self.transaction_hash)?;
        writeln!(f, "Status: {}", if self.status { "success" } else { "failed" })?;
        match (self.block_number, self.block_hash) {
            (Some(number), Some(hash)) => writeln!(f, "Block: {} ({})", number, hash)?,
            (Some(number), None) => writeln!(f, "Block: {}", number)?,
            _ => writeln!(f, "Block: pending")?,
        }
        writeln!(f, "Gas used: {}", self.gas_used)?;
        writeln!(f, "Effective gas price: {} wei", self.effective_gas_price)?;
        writeln!(f, "From: {}", self.from)?;
        match (self.to, self.contract_address) {
            (Some(to), _) => write!(f, "To: {}", to),
            (None, Some(created)) => write!(f, "Contract created: {}", created),
            (None, None) => write!(f, "To: -"),
        }
    }
}
