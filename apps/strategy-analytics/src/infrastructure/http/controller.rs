//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API over the payoff, metrics, optimizer and
//! implied-volatility operations. Every handler is a pure function of its
//! request and the shared configuration.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::AnalyticsError;
use crate::observability::record_http_request;
use crate::optimizer::StrategyOptimizer;
use crate::pricing::{IvSolver, OptionQuote};
use crate::strategy::{CurveSpec, StrategyMetrics, generate_curve, validate_market};

use super::request::{ImpliedVolatilityRequest, MetricsRequest, OptimizeRequest, PayoffRequest};
use super::response::{
    HealthResponse, ImpliedVolatilityResponse, MetricsResponse, OptimizeResponse,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Optimizer built from `config.optimizer`.
    pub optimizer: Arc<StrategyOptimizer>,
    /// IV solver with default tolerances.
    pub iv_solver: Arc<IvSolver>,
    /// Application version.
    pub version: String,
}

impl AppState {
    /// Build handler state from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let optimizer = StrategyOptimizer::new(config.optimizer.clone())
            .with_curve_intervals(config.curve.intervals);
        Self {
            config: Arc::new(config),
            optimizer: Arc::new(optimizer),
            iv_solver: Arc::new(IvSolver::default()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/payoff", post(payoff))
        .route("/api/v1/metrics", post(metrics))
        .route("/api/v1/optimize", post(optimize))
        .route("/api/v1/implied-volatility", post(implied_volatility))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    record_http_request("/health", StatusCode::OK.as_u16());
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Sampled P&L curve endpoint.
#[tracing::instrument(skip_all)]
async fn payoff(
    State(state): State<AppState>,
    payload: Result<Json<PayoffRequest>, JsonRejection>,
) -> Response {
    let result = parse(payload).and_then(|request| {
        let market = request
            .market
            .resolve(&state.config.pricing, Utc::now().date_naive())?;
        let spec = request.curve.unwrap_or_else(|| {
            CurveSpec::around(&request.strategy, market.spot, state.config.curve.intervals)
        });
        generate_curve(&request.strategy, &market, &spec, request.mode)
    });
    respond("/api/v1/payoff", result)
}

/// Strategy metrics endpoint.
#[tracing::instrument(skip_all)]
async fn metrics(
    State(state): State<AppState>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> Response {
    let result = parse(payload).and_then(|request| {
        let market = request
            .market
            .resolve(&state.config.pricing, Utc::now().date_naive())?;
        let (metrics, curve) = StrategyMetrics::compute_with_intervals(
            &request.strategy,
            &market,
            state.config.curve.intervals,
        )?;
        Ok(MetricsResponse { metrics, curve })
    });
    respond("/api/v1/metrics", result)
}

/// Optimizer endpoint.
#[tracing::instrument(skip_all)]
async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Response {
    let result = parse(payload).and_then(|request| {
        let market = request
            .market
            .resolve(&state.config.pricing, Utc::now().date_naive())?;
        let candidates = state.optimizer.optimize(&market, &request.request)?;
        Ok(OptimizeResponse { candidates })
    });
    respond("/api/v1/optimize", result)
}

/// Implied volatility endpoint.
#[tracing::instrument(skip_all)]
async fn implied_volatility(
    State(state): State<AppState>,
    payload: Result<Json<ImpliedVolatilityRequest>, JsonRejection>,
) -> Response {
    let result = parse(payload).and_then(|request| {
        let market = request
            .market
            .resolve_for_quote(&state.config.pricing, Utc::now().date_naive())?;
        validate_market(&market)?;
        let quote = OptionQuote::from_market(
            request.option_type,
            request.premium,
            request.strike,
            &market,
        );
        let implied_volatility = state.iv_solver.solve(&quote)?;
        Ok(ImpliedVolatilityResponse { implied_volatility })
    });
    respond("/api/v1/implied-volatility", result)
}

/// Unwrap a JSON body, reporting rejections in the API error shape.
fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AnalyticsError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AnalyticsError::invalid_request("body", rejection.body_text()))
}

fn respond<T: Serialize>(route: &'static str, result: Result<T, AnalyticsError>) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            tracing::warn!(route, code = %err.code(), error = %err, "Request rejected");
            err.into_response()
        }
    };
    record_http_request(route, response.status().as_u16());
    response
}
