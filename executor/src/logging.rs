//! Tracing setup shared by the executor binaries.
//!
//! Diagnostics only: everything goes to stderr and nothing is persisted.
//! Clients see command output through the HTTP responses, not the log.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "executor=info,executor_server=info,tower_http=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to info-level logs for the executor crates.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=executor=debug,tower_http=debug executor-server --port 5000
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
