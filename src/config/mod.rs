//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → validation.rs (semantic checks)
//!     → CLI flag overrides applied by the dispatcher
//!     → CliConfig (validated, immutable for the rest of the command)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so running without a config file works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{CliConfig, LoggingConfig, RpcConfig, StorageConfig};
