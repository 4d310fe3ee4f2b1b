//! Observability module for metrics.
//!
//! Prometheus export of engine and HTTP counters. Logging is configured
//! separately in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_http_request, record_optimizer_candidates,
    record_optimizer_run, record_strategy_evaluation,
};
