//! Structured logging.
//!
//! Filter precedence: `RUST_LOG` if set, otherwise the configured directive.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter used by [`init_logging`].
pub fn build_filter(default_directive: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Must be called at most once per process.
pub fn init_logging(default_directive: &str) -> Result<(), ParseError> {
    tracing_subscriber::registry()
        .with(build_filter(default_directive)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
    Ok(())
}
