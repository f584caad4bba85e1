//! Tracing setup helpers.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber with human-readable output.
///
/// Filter directives come from `RUST_LOG`, falling back to `info`. Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing() {
    init_tracing_with_filter("info");
}

/// Initializes tracing with an explicit fallback filter.
pub fn init_tracing_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Initializes tracing with JSON output for log shippers.
pub fn init_tracing_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}
