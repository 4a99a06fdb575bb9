//! # citerag-telemetry
//!
//! Logging initialisation shared by the citerag binaries.
//!
//! Logs are written to stderr so that stdout carries only command output.
//! `RUST_LOG`, when set, takes precedence over the level passed in.
//!
//! ```rust,no_run
//! citerag_telemetry::init_telemetry("info").ok();
//! tracing::info!(query = "rent", "starting query");
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Level used when neither `RUST_LOG` nor the caller's level parses.
pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter: `RUST_LOG` if set and valid, else `default_level`,
/// else [`DEFAULT_LEVEL`].
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install a human-readable subscriber as the global default.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(default_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
}

/// Install a JSON-lines subscriber as the global default.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_json(default_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        let filter = env_filter("not a [valid filter");
        assert!(!filter.to_string().is_empty());
    }

    #[tokio::test]
    async fn second_init_fails() {
        let _ = init_telemetry("debug");
        assert!(init_json("debug").is_err());
        tracing::info!(component = "telemetry", "subscriber installed");
    }
}
