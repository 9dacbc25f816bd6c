//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkRegistry (name → endpoint)
//!     → client.rs (RPC connection with liveness check and timeouts)
//!     → transaction.rs (fetch nonce/gas/chain id, build, sign, broadcast)
//! Keystore (address → key)
//!     → transaction.rs (signer)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Connection failures are returned to the caller, never fatal

pub mod client;
pub mod transaction;
pub mod types;

pub use client::{ChainApi, ChainClient};
pub use transaction::{build_and_send, TransferError, TxBuilder, TRANSFER_GAS_LIMIT};
pub use types::{BlockchainError, BlockchainResult, ChainId, ReceiptSummary};
