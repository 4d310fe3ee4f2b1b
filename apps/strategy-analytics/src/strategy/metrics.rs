//! Strategy risk/reward metrics.
//!
//! Bounds come from the at-expiration curve plus a tail-slope check above
//! the highest strike: the payoff is linear there, so a non-zero slope means
//! the corresponding extreme is unbounded. Below the lowest strike the price
//! is floored at zero, so the lower tail is always bounded and the payoff at
//! zero is included as a sample.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::observability::record_strategy_evaluation;
use crate::options::{Greeks, MarketContext, StrategyInstance, aggregate_greeks};
use crate::pricing::{black_scholes, probability_of_profit};

use super::breakeven::{find_breakevens, snap_to_zero, zero_tolerance};
use super::payoff::{CurveMode, CurveSpec, PnlCurve, generate_curve};
use super::validation::{validate_market, validate_strategy};

/// Intervals used for the default curve domain.
pub const DEFAULT_CURVE_INTERVALS: usize = 400;

/// Tail slopes smaller than this are treated as flat.
const SLOPE_TOLERANCE: f64 = 1e-9;

/// Losses smaller than this do not support a return-on-risk ratio.
const MIN_RISK: f64 = 1e-9;

/// Direction in which a payoff grows without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TailDirection {
    /// As the underlying price rises.
    Upward,
}

/// Maximum profit or loss of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Extremum {
    /// Dollar amount (losses are negative).
    Finite(f64),
    /// Grows without bound in the given direction.
    Unbounded(TailDirection),
}

impl Extremum {
    /// The dollar amount, if bounded.
    #[must_use]
    pub const fn finite(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Unbounded(_) => None,
        }
    }

    /// Whether the extreme is unbounded.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded(_))
    }
}

/// Max profit over max loss, when both are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ReturnOnRisk {
    /// `max_profit / |max_loss|`.
    Ratio(f64),
    /// Either side is unbounded or the loss is zero.
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl ReturnOnRisk {
    /// The ratio, if applicable.
    #[must_use]
    pub const fn ratio(&self) -> Option<f64> {
        match self {
            Self::Ratio(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }
}

/// Risk/reward summary of one strategy under one market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMetrics {
    /// Best P&L at expiration.
    pub max_profit: Extremum,
    /// Worst P&L at expiration (negative for a loss).
    pub max_loss: Extremum,
    /// Prices where the at-expiration P&L is zero, ascending.
    pub breakevens: Vec<f64>,
    /// Risk-neutral probability of finishing profitable, in `[0, 1]`.
    pub probability_of_profit: f64,
    /// Max profit over max loss.
    pub return_on_risk: ReturnOnRisk,
    /// Position greeks in dollar-per-share units times exposure.
    pub greeks: Greeks,
    /// Net entry premium (positive = credit).
    pub net_premium: f64,
}

impl StrategyMetrics {
    /// Compute metrics over the default curve domain around spot and strikes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid strategy or market.
    pub fn compute(
        strategy: &StrategyInstance,
        market: &MarketContext,
    ) -> Result<Self, AnalyticsError> {
        Self::compute_with_intervals(strategy, market, DEFAULT_CURVE_INTERVALS)
            .map(|(metrics, _)| metrics)
    }

    /// Compute the default at-expiration curve and the metrics derived from it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid strategy or market.
    pub fn compute_with_intervals(
        strategy: &StrategyInstance,
        market: &MarketContext,
        intervals: usize,
    ) -> Result<(Self, PnlCurve), AnalyticsError> {
        let spec = CurveSpec::around(strategy, market.spot, intervals);
        let curve = generate_curve(strategy, market, &spec, CurveMode::AtExpiration)?;
        let metrics = Self::compute_with_curve(strategy, market, &curve)?;
        Ok((metrics, curve))
    }

    /// Compute metrics from a caller-supplied at-expiration curve.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid strategy or market, or a
    /// mark-to-model curve.
    pub fn compute_with_curve(
        strategy: &StrategyInstance,
        market: &MarketContext,
        curve: &PnlCurve,
    ) -> Result<Self, AnalyticsError> {
        validate_strategy(strategy)?;
        validate_market(market)?;
        if curve.mode != CurveMode::AtExpiration {
            return Err(AnalyticsError::invalid_request(
                "curve.mode",
                "metrics require an at-expiration curve",
            ));
        }

        let started = Instant::now();

        let tolerance = zero_tolerance(curve);
        let floor = strategy.payoff_at_expiration(0.0);
        let best = curve.max_point().map_or(floor, |p| p.pnl.max(floor));
        let worst = curve.min_point().map_or(floor, |p| p.pnl.min(floor));
        let (best, worst) = (snap_to_zero(best, tolerance), snap_to_zero(worst, tolerance));

        let slope = strategy.upper_tail_slope();
        let max_profit = if slope > SLOPE_TOLERANCE {
            Extremum::Unbounded(TailDirection::Upward)
        } else {
            Extremum::Finite(best)
        };
        let max_loss = if slope < -SLOPE_TOLERANCE {
            Extremum::Unbounded(TailDirection::Upward)
        } else {
            Extremum::Finite(worst)
        };

        let return_on_risk = match (max_profit, max_loss) {
            (Extremum::Finite(profit), Extremum::Finite(loss)) if loss.abs() > MIN_RISK => {
                ReturnOnRisk::Ratio(profit / loss.abs())
            }
            _ => ReturnOnRisk::NotApplicable,
        };

        let breakevens = find_breakevens(curve);
        let tau = market.time_to_expiry();
        let probability_of_profit = probability_of_profit(
            &breakevens,
            |price| snap_to_zero(strategy.payoff_at_expiration(price), tolerance),
            market.spot,
            market.implied_volatility,
            tau,
            market.risk_free_rate,
            market.dividend_yield,
        );

        let metrics = Self {
            max_profit,
            max_loss,
            breakevens,
            probability_of_profit,
            return_on_risk,
            greeks: position_greeks(strategy, market),
            net_premium: strategy.net_premium(),
        };

        record_strategy_evaluation(started.elapsed().as_secs_f64());
        tracing::debug!(
            strategy = %strategy.name,
            breakevens = metrics.breakevens.len(),
            pop = metrics.probability_of_profit,
            "Strategy metrics computed"
        );

        Ok(metrics)
    }
}

/// Sum of per-leg greeks scaled by exposure, plus one delta per stock share.
#[must_use]
pub fn position_greeks(strategy: &StrategyInstance, market: &MarketContext) -> Greeks {
    let tau = market.time_to_expiry();
    let legs = aggregate_greeks(strategy.legs.iter().map(|leg| {
        let per_share = black_scholes::greeks(
            leg.option_type,
            market.spot,
            leg.strike,
            market.risk_free_rate,
            market.dividend_yield,
            market.implied_volatility,
            tau,
        );
        (per_share, leg.exposure())
    }));

    match &strategy.stock {
        Some(stock) => legs.add(&Greeks::new(stock.shares as f64, 0.0, 0.0, 0.0, 0.0)),
        None => legs,
    }
}

/// Capital a strategy ties up: its worst-case loss at expiration, and at
/// least the net debit paid.
///
/// The payoff is piecewise linear with kinks at strikes, so the worst case
/// over `[0, inf)` is at zero, at a strike, or in an unbounded upper tail.
/// Returns `None` for unbounded risk.
#[must_use]
pub fn capital_requirement(strategy: &StrategyInstance) -> Option<f64> {
    if strategy.upper_tail_slope() < -SLOPE_TOLERANCE {
        return None;
    }

    let worst = std::iter::once(0.0)
        .chain(strategy.strikes())
        .map(|price| strategy.payoff_at_expiration(price))
        .fold(f64::INFINITY, f64::min);
    let debit = (-strategy.net_premium()).max(0.0);

    Some((-worst).max(debit).max(0.0))
}
