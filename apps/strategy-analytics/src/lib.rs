// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::items_after_statements,
        clippy::suboptimal_flops
    )
)]

//! Strategy Analytics - Rust Core Library
//!
//! Stateless engine that evaluates multi-leg options strategies: payoff
//! curves, breakevens, max profit/loss, risk-neutral probability of profit
//! and aggregate greeks, plus an optimizer that proposes and ranks
//! strategies for a sentiment, target price and budget.
//!
//! # Layers (inside → outside)
//!
//! - **Options**: Value objects (`Leg`, `StrategyInstance`, `MarketContext`, `Greeks`)
//! - **Pricing**: Normal distribution, Black-Scholes-Merton, probabilities, IV solver
//! - **Strategy**: Payoff curves, breakevens, metrics, validation
//! - **Optimizer**: Template catalog, strike selection, ranking
//! - **Infrastructure**: HTTP adapter
//!
//! Cross-cutting: `config` (YAML with env interpolation), `telemetry`
//! (tracing subscriber), `observability` (Prometheus metrics), `error`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Error types shared by every layer.
pub mod error;

/// Options value objects.
pub mod options;

/// Pricing and probability primitives.
pub mod pricing;

/// Strategy evaluation: curves, breakevens, metrics.
pub mod strategy;

/// Strategy generation and ranking.
pub mod optimizer;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading.
pub mod config;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AnalyticsError, ErrorCode, HttpErrorResponse};
pub use options::{
    Greeks, Leg, LegAction, MarketContext, OptionType, StockPosition, StrategyInstance,
};
pub use optimizer::{
    OptimizerConfig, OptimizerRequest, RankedStrategy, RankingMode, Sentiment, StrategyOptimizer,
};
pub use strategy::{CurveMode, CurveSpec, Extremum, PnlCurve, PnlPoint, StrategyMetrics};

pub use config::{Config, ConfigError, load_config};
pub use infrastructure::http::{AppState, create_router};
