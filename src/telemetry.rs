//! Tracing subscriber setup for binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` when set. Calling this
/// more than once is harmless: later calls leave the first subscriber in
/// place.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Err(err) = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
    {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}
