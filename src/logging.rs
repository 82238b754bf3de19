//! Tracing subscriber setup shared by the binaries.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `level` is an `EnvFilter` directive string (the value of `RUST_LOG`), and
/// `format` is either `text` or `json`.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already set.
pub fn init(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log filter '{level}'"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
