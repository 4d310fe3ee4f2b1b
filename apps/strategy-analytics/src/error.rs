//! Error handling for the analytics engine.
//!
//! Structural input problems are rejected before any computation with a
//! tagged `AnalyticsError`. Degenerate market states (zero volatility,
//! expired options) are not errors; the pricer and probability model
//! fall back to intrinsic value and neutral probabilities instead.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed request, bad curve or optimizer parameters |
//! | `INVALID_STRATEGY` | 422 | Empty leg list, non-positive strike/quantity/multiplier |
//! | `INVALID_MARKET` | 422 | Non-positive spot, non-finite market inputs |
//! | `NO_VOLATILITY_SOLUTION` | 422 | Premium admits no implied volatility |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::IvError;

/// Error codes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request format or parameters.
    InvalidRequest,
    /// Strategy legs or stock position are invalid.
    InvalidStrategy,
    /// Market snapshot is invalid.
    InvalidMarket,
    /// Implied volatility could not be solved.
    NoVolatilitySolution,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::InvalidStrategy | Self::InvalidMarket | Self::NoVolatilitySolution => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidStrategy => "INVALID_STRATEGY",
            Self::InvalidMarket => "INVALID_MARKET",
            Self::NoVolatilitySolution => "NO_VOLATILITY_SOLUTION",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Which part of the input an `InvalidInput` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputScope {
    /// Strategy legs or stock position.
    Strategy,
    /// Market snapshot.
    Market,
    /// Curve domain, optimizer request and other call parameters.
    Request,
}

/// Errors returned by the analytics engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Structurally invalid input, rejected before computation.
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Part of the input the field belongs to.
        scope: InputScope,
        /// Offending field (e.g. `legs[1].strike`).
        field: String,
        /// Human-readable message.
        message: String,
    },

    /// Implied volatility solver failure.
    #[error("Implied volatility: {0}")]
    ImpliedVolatility(#[from] IvError),
}

impl AnalyticsError {
    /// Invalid strategy field.
    #[must_use]
    pub fn invalid_strategy(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            scope: InputScope::Strategy,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Invalid market field.
    #[must_use]
    pub fn invalid_market(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            scope: InputScope::Market,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Invalid request parameter.
    #[must_use]
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            scope: InputScope::Request,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { scope, .. } => match scope {
                InputScope::Strategy => ErrorCode::InvalidStrategy,
                InputScope::Market => ErrorCode::InvalidMarket,
                InputScope::Request => ErrorCode::InvalidRequest,
            },
            Self::ImpliedVolatility(IvError::InvalidInput { .. }) => ErrorCode::InvalidRequest,
            Self::ImpliedVolatility(_) => ErrorCode::NoVolatilitySolution,
        }
    }

    /// Convert to an HTTP-compatible error response.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        let mut details = HashMap::new();
        if let Self::InvalidInput { field, .. } = self {
            details.insert("field".to_string(), field.clone());
        }
        HttpErrorResponse {
            code: self.code().reason().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    #[serde(default)]
    pub details: HashMap<String, String>,
}
