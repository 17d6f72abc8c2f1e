//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Apply the configured level, with `RUST_LOG` taking precedence
//!
//! # Design Decisions
//! - Logs go to stderr so command output on stdout stays machine-readable
//! - A second initialization is ignored rather than treated as an error

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log levels accepted in `[observability] log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Default filter directive for a level.
pub fn default_directive(log_level: &str) -> String {
    format!("recipient_router={},route_cli={}", log_level, log_level)
}

/// Install the global subscriber.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_ok() {
        tracing::debug!(log_level, "Logging initialized");
    }
}
