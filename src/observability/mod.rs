//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (connect, submit, save, RPC failures)
//!     → logging.rs subscriber → stderr
//! ```
//!
//! # Design Decisions
//! - stdout carries only command results so output stays scriptable
//! - Private keys never appear in log fields

pub mod logging;

pub use logging::init_logging;
