//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CliConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::CliConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for values serde cannot reject on its own.
pub fn validate_config(config: &CliConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.storage.keystore_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("storage.keystore_path", "must not be empty"));
    }
    if config.storage.networks_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("storage.networks_path", "must not be empty"));
    }
    if !config.storage.keystore_path.as_os_str().is_empty()
        && config.storage.keystore_path == config.storage.networks_path
    {
        errors.push(ValidationError::new(
            "storage.networks_path",
            "must differ from storage.keystore_path",
        ));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }
    if config.logging.filter.trim().is_empty() {
        errors.push(ValidationError::new("logging.filter", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
