//! Configuration management: database wiring, application settings, tracing.

/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber with an env-filter.
///
/// Defaults to `info` when `RUST_LOG` is unset. Intended for binaries and
/// integration harnesses embedding this crate; calling it twice is a no-op
/// apart from the second call's error being swallowed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
