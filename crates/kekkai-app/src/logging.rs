//! Tracing subscriber setup for the host binary.

use tracing_subscriber::EnvFilter;

/// Install a compact stdout subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
