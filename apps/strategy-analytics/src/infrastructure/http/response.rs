//! HTTP response DTOs.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::optimizer::RankedStrategy;
use crate::strategy::{PnlCurve, StrategyMetrics};

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Metrics together with the curve they were derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    /// Strategy metrics.
    pub metrics: StrategyMetrics,
    /// At-expiration P&L curve.
    pub curve: PnlCurve,
}

/// Ranked optimizer output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    /// Candidates, best first.
    pub candidates: Vec<RankedStrategy>,
}

/// Solved implied volatility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpliedVolatilityResponse {
    /// Annualized volatility.
    pub implied_volatility: f64,
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        (self.code().http_status(), Json(self.to_http_response())).into_response()
    }
}
