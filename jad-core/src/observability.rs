//! Tracing subscriber initialization
//!
//! The engine logs through `tracing`: routing decisions at debug, decode and
//! call failures at warn. This module installs a formatted subscriber with
//! an env-filter so integrators get structured output without wiring their
//! own subscriber. `RUST_LOG` takes precedence over the configured filter.

use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Filter directives used when `RUST_LOG` is not set, e.g. `"info"` or
    /// `"jad_server=debug"`.
    pub filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Call once at process startup, before serving begins.
///
/// # Errors
///
/// Returns [`Error::Observability`] if the filter directives are invalid or
/// a global subscriber is already installed.
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::Observability(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Observability(e.to_string()))
}
