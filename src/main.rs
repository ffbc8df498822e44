//! netdash — a desktop dashboard for the local PacketBuddy traffic monitor.
//!
//! Run with:  `RUST_LOG=info netdash`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("netdash v{} starting", env!("CARGO_PKG_VERSION"));

    netdash_app::run().map_err(Into::into)
}
