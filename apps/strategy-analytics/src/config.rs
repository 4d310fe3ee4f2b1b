//! Configuration module for the analytics service.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before use. Every section has defaults, so an empty file
//! (or no file at all) yields a runnable configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_analytics::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimizer::OptimizerConfig;
use crate::strategy::{DEFAULT_CURVE_INTERVALS, MAX_CURVE_SAMPLES};

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Environment interpolation pattern failed to compile.
    #[error("Invalid interpolation pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Pricing defaults applied to market snapshots.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Default curve sampling.
    #[serde(default)]
    pub curve: CurveConfig,
    /// Optimizer settings.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Socket address the HTTP server binds.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `bind_address` is not an IP address.
    pub fn http_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(
            parse_bind_address(&self.server.bind_address)?,
            self.server.http_port,
        ))
    }

    /// Socket address of the Prometheus listener.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `bind_address` is not an IP address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(
            parse_bind_address(&self.server.bind_address)?,
            self.observability.metrics_port,
        ))
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port for REST endpoints (/health, /api/v1/*).
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

const fn default_http_port() -> u16 {
    8080
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate used when a market snapshot omits one.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Dividend yield used when a market snapshot omits one.
    #[serde(default)]
    pub default_dividend_yield: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            default_dividend_yield: 0.0,
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.05
}

/// Curve sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Equal steps across the default curve domain.
    #[serde(default = "default_intervals")]
    pub intervals: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            intervals: default_intervals(),
        }
    }
}

const fn default_intervals() -> usize {
    DEFAULT_CURVE_INTERVALS
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Start the Prometheus exporter.
    #[serde(default)]
    pub metrics_enabled: bool,
    /// Prometheus listener port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
const fn default_metrics_port() -> u16 {
    9090
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml)?;
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

fn env_var_regex() -> Result<&'static Regex, ConfigError> {
    static ENV_VAR_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

    ENV_VAR_REGEX
        .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}"))
        .as_ref()
        .map_err(|e| ConfigError::PatternError(e.clone()))
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = env_var_regex()?;

    let result = re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    });

    Ok(result.into_owned())
}

fn parse_bind_address(address: &str) -> Result<IpAddr, ConfigError> {
    address.parse().map_err(|_| {
        ConfigError::ValidationError(format!("bind_address '{address}' is not an IP address"))
    })
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    parse_bind_address(&config.server.bind_address)?;

    if config.observability.metrics_enabled
        && config.observability.metrics_port == config.server.http_port
    {
        return Err(ConfigError::ValidationError(
            "http_port and metrics_port must be different".to_string(),
        ));
    }

    // Validate pricing parameters
    if !(0.0..=1.0).contains(&config.pricing.risk_free_rate) {
        return Err(ConfigError::ValidationError(
            "risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.pricing.default_dividend_yield) {
        return Err(ConfigError::ValidationError(
            "default_dividend_yield must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.curve.intervals == 0 || config.curve.intervals >= MAX_CURVE_SAMPLES {
        return Err(ConfigError::ValidationError(format!(
            "curve.intervals must be between 1 and {}",
            MAX_CURVE_SAMPLES - 1
        )));
    }

    // Validate optimizer settings
    let optimizer = &config.optimizer;
    if optimizer.top_n == 0 {
        return Err(ConfigError::ValidationError(
            "optimizer.top_n must be at least 1".to_string(),
        ));
    }
    if optimizer.contract_multiplier == 0 {
        return Err(ConfigError::ValidationError(
            "optimizer.contract_multiplier must be at least 1".to_string(),
        ));
    }
    if let Some(increment) = optimizer.strike_increment {
        if !(increment.is_finite() && increment > 0.0) {
            return Err(ConfigError::ValidationError(
                "optimizer.strike_increment must be positive".to_string(),
            ));
        }
    }

    // Validate observability settings
    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.observability.log_format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.log_format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
