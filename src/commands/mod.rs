//! Command implementations behind the CLI.
//!
//! # Data Flow
//! ```text
//! main.rs (clap parse, config, logging)
//!     → open registries from StorageConfig
//!     → handlers.rs (one function per subcommand)
//!         → registry lookups / mutations (+ save)
//!         → ChainClient / build_and_send for chain operations
//!     → typed result printed by main.rs
//! ```
//!
//! # Design Decisions
//! - Inputs are validated before any connection is opened
//! - Registries are saved only by commands that mutate them
//! - Nothing is retried; the first failure is returned with its stage

pub mod handlers;

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::{BlockchainError, TransferError};
use crate::config::{ConfigError, StorageConfig};
use crate::registry::{Keystore, NetworkRegistry};
use crate::storage::{FileStore, StorageError};

pub use handlers::*;

/// Any failure a command can report to the user.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The network name is not registered.
    #[error("unknown network '{0}' (register it with set-network)")]
    UnknownNetwork(String),

    /// The keystore holds no key for this address.
    #[error("no private key for wallet {0} (create one with generate-wallet)")]
    UnknownWallet(Address),
}

/// Result type for command handlers.
pub type CommandResult<T> = Result<T, CommandError>;

/// Open the keystore file named in `storage`; the file is created owner-only.
pub fn open_keystore(storage: &StorageConfig) -> Result<Keystore, StorageError> {
    Keystore::open(FileStore::owner_only(&storage.keystore_path))
}

/// Open the network file named in `storage`.
pub fn open_networks(storage: &StorageConfig) -> Result<NetworkRegistry, StorageError> {
    NetworkRegistry::open(FileStore::new(&storage.networks_path))
}
