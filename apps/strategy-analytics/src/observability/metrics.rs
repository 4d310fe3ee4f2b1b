//! Prometheus metrics for the analytics engine.
//!
//! Recording goes through the `metrics` facade, so every `record_*` call is
//! a no-op until a recorder is installed with [`init_metrics`].
//!
//! # Example
//!
//! ```ignore
//! use strategy_analytics::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_strategy_evaluation(0.0004);
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

const STRATEGY_EVALUATIONS: &str = "strategy_evaluations_total";
const STRATEGY_EVALUATION_SECONDS: &str = "strategy_evaluation_seconds";
const OPTIMIZER_RUNS: &str = "optimizer_runs_total";
const OPTIMIZER_CANDIDATES: &str = "optimizer_candidates";
const HTTP_REQUESTS: &str = "http_requests_total";

/// Prometheus listener settings.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Where `/metrics` is served.
    pub listen_addr: SocketAddr,
    /// Histogram buckets, in seconds for latencies.
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // A metrics call is tens of microseconds; optimizer runs reach 100ms
            latency_buckets: vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Default buckets, listening on `addr`.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Exporter setup failures.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Bucket configuration rejected.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Listener or global recorder could not be installed.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder and its `/metrics` HTTP listener, then
/// register descriptions for every engine metric.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error for invalid buckets, a port already in use, or a
/// recorder that is already installed.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    describe_metrics();
    tracing::info!(addr = %config.listen_addr, "Prometheus metrics exporter started");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(STRATEGY_EVALUATIONS, "Strategy metric evaluations");
    describe_histogram!(
        STRATEGY_EVALUATION_SECONDS,
        Unit::Seconds,
        "Time to derive metrics from a payoff curve"
    );
    describe_counter!(OPTIMIZER_RUNS, "Optimizer requests by sentiment and ranking");
    describe_histogram!(
        OPTIMIZER_CANDIDATES,
        Unit::Count,
        "Candidates remaining after each optimizer stage"
    );
    describe_counter!(HTTP_REQUESTS, "HTTP requests by route and status");
}

/// Record one strategy metrics evaluation and its latency.
pub fn record_strategy_evaluation(latency_seconds: f64) {
    counter!(STRATEGY_EVALUATIONS).increment(1);
    histogram!(STRATEGY_EVALUATION_SECONDS).record(latency_seconds);
}

/// Record an optimizer run.
pub fn record_optimizer_run(sentiment: &'static str, ranking: &'static str) {
    counter!(OPTIMIZER_RUNS, "sentiment" => sentiment, "ranking" => ranking).increment(1);
}

/// Record how many candidates survived a pipeline stage.
///
/// # Arguments
///
/// * `stage` - Pipeline stage (e.g., "catalog", "priced", "budget", "ranked")
/// * `count` - Candidates remaining after the stage
pub fn record_optimizer_candidates(stage: &'static str, count: usize) {
    histogram!(OPTIMIZER_CANDIDATES, "stage" => stage).record(count as f64);
}

/// Record a handled HTTP request.
pub fn record_http_request(route: &'static str, status: u16) {
    counter!(HTTP_REQUESTS, "route" => route, "status" => status.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert_eq!(config.listen_addr.port(), 9090);
        assert!(!config.latency_buckets.is_empty());
    }

    #[test]
    fn test_metrics_config_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9100".parse().unwrap();
        let config = MetricsConfig::with_addr(addr);
        assert_eq!(config.listen_addr, addr);
    }

    #[test]
    fn test_latency_buckets_are_ascending() {
        let config = MetricsConfig::default();
        assert!(config.latency_buckets.windows(2).all(|w| w[0] < w[1]));
        assert!(config.latency_buckets.iter().all(|b| *b <= 1.0));
    }

    #[test]
    fn test_describe_without_recorder() {
        describe_metrics();
    }

    #[test]
    fn test_record_without_recorder() {
        // Without an installed recorder these are no-ops and must not panic
        record_strategy_evaluation(0.0004);
        record_optimizer_run("bullish", "maxReturn");
        record_optimizer_candidates("budget", 7);
        record_http_request("/api/v1/metrics", 200);
    }
}
