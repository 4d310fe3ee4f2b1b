//! Strategy Analytics Binary
//!
//! Serves the analytics engine over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin strategy-analytics
//! ```
//!
//! # Environment Variables
//!
//! - `STRATEGY_ANALYTICS_CONFIG`: Path to the YAML config (default: config.yaml).
//!   Defaults apply when the file does not exist.
//! - `RUST_LOG`: Log filter; overrides `observability.log_level`

use std::path::Path;

use anyhow::Context;
use strategy_analytics::config::{Config, DEFAULT_CONFIG_PATH, load_config};
use strategy_analytics::infrastructure::http::{AppState, create_router};
use strategy_analytics::observability::{MetricsConfig, init_metrics};
use strategy_analytics::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = read_config()?;
    init_tracing(&config.observability).context("failed to initialize tracing")?;

    tracing::info!("Starting Strategy Analytics");

    if config.observability.metrics_enabled {
        let metrics_addr = config.metrics_addr()?;
        init_metrics(&MetricsConfig::with_addr(metrics_addr))
            .context("failed to install Prometheus exporter")?;
        tracing::info!(%metrics_addr, "Prometheus metrics listening");
    }

    let http_addr = config.http_addr()?;
    let app = create_router(AppState::new(config));

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/payoff");
    tracing::info!("  POST /api/v1/metrics");
    tracing::info!("  POST /api/v1/optimize");
    tracing::info!("  POST /api/v1/implied-volatility");

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Strategy Analytics stopped");
    Ok(())
}

/// Load the config file, or defaults when it does not exist.
fn read_config() -> anyhow::Result<Config> {
    let path = std::env::var("STRATEGY_ANALYTICS_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        load_config(Some(&path)).with_context(|| format!("failed to load {path}"))
    } else {
        Ok(Config::default())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
