//! Named lookups that feed every command.
//!
//! # Data Flow
//! ```text
//! wallets.json  → keystore.rs  (address → private key)
//! networks.json → networks.rs  (network name → RPC endpoint)
//!
//! load at command start → mutate in memory → save after mutating commands
//! ```
//!
//! # Design Decisions
//! - Registries are plain owned values passed to whoever needs them
//! - Backing storage is injected (file on disk, memory in tests)
//! - Concurrent processes sharing the same files are not coordinated

pub mod keystore;
pub mod networks;

pub use keystore::{Keystore, WalletEntry};
pub use networks::NetworkRegistry;
