//! Strategy evaluation.
//!
//! This module provides:
//! - At-expiration and mark-to-model payoff curves
//! - Breakeven detection on sampled curves
//! - Max profit/loss classification, probability of profit and position greeks
//! - Structural validation of strategies and market snapshots
//!
//! # Example
//!
//! ```
//! use strategy_analytics::options::{Leg, MarketContext, StrategyInstance};
//! use strategy_analytics::strategy::{Extremum, StrategyMetrics};
//!
//! let spread = StrategyInstance::new(
//!     "bcs",
//!     "Bull Call Spread",
//!     vec![Leg::buy_call(95.0, 12.0), Leg::sell_call(120.0, 2.0)],
//! );
//! let market = MarketContext::new(100.0, 0.25, 30, 0.05);
//!
//! let metrics = StrategyMetrics::compute(&spread, &market).unwrap();
//! assert_eq!(metrics.max_loss, Extremum::Finite(-1000.0));
//! assert!((metrics.breakevens[0] - 105.0).abs() < 1e-9);
//! ```

mod breakeven;
mod metrics;
mod payoff;
mod validation;

pub use breakeven::find_breakevens;
pub use metrics::{
    DEFAULT_CURVE_INTERVALS, Extremum, ReturnOnRisk, StrategyMetrics, TailDirection,
    capital_requirement, position_greeks,
};
pub use payoff::{
    CurveMode, CurveSpec, MAX_CURVE_SAMPLES, PnlCurve, PnlPoint, generate_curve,
    leg_payoff_at_expiration, mark_to_model, payoff_at_expiration,
};
pub use validation::{validate_market, validate_strategy};
