//! Tracing Setup
//!
//! Initializes a `tracing_subscriber::fmt` subscriber from the
//! observability configuration.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; overrides `observability.log_level`
//! - `observability.log_format`: `pretty` (human-readable) or `json`
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_analytics::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability)?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Tracing initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or `RUST_LOG` directives could not be parsed.
    #[error("Invalid log filter '{directives}': {message}")]
    InvalidFilter {
        /// Directives that failed to parse.
        directives: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG`, falling back to the configured level.
///
/// # Errors
///
/// Returns `InvalidFilter` if neither source parses.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
        directives: config.log_level.clone(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    let installed = if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(env_filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))?;

    tracing::info!(
        level = %config.log_level,
        format = %config.log_format,
        "Tracing initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_from_config_level() {
        let config = ObservabilityConfig {
            log_level: "strategy_analytics=debug,info".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_init_twice_reports_error() {
        let config = ObservabilityConfig::default();
        // The first call may race with other tests; the second always fails
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(TelemetryError::Install(_))));
    }
}
