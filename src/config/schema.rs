//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Where the registries live.
    pub storage: StorageConfig,

    /// RPC client settings.
    pub rpc: RpcConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Registry file locations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Keystore file (address → private key).
    pub keystore_path: PathBuf,

    /// Network file (name → RPC endpoint).
    pub networks_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            keystore_path: PathBuf::from("wallets.json"),
            networks_path: PathBuf::from("networks.json"),
        }
    }
}

/// RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// Upper bound on each RPC request, in seconds.
    pub timeout_secs: u64,
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
