//! Command-line client for Ethereum-compatible nodes.
//!
//! Wallet generation, named RPC endpoints, chain queries, and signed value
//! transfers.

pub mod blockchain;
pub mod commands;
pub mod config;
pub mod observability;
pub mod registry;
pub mod storage;

pub use config::CliConfig;
pub use registry::{Keystore, NetworkRegistry};
