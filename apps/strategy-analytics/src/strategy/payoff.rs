//! Payoff and P&L curve generation.
//!
//! At expiration every leg is worth its intrinsic value, so the strategy
//! payoff is piecewise linear with kinks only at strikes. Before expiration
//! the legs are revalued with Black-Scholes at the remaining time
//! (mark-to-model). Curve samples always include spot and every strike so
//! the kinks are exact.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::options::{Leg, MarketContext, StrategyInstance};
use crate::pricing::black_scholes;

use super::validation::{validate_market, validate_strategy};

/// Upper bound on samples in one curve.
pub const MAX_CURVE_SAMPLES: usize = 100_000;

/// Grid points closer than this to an anchor (spot or strike) are replaced
/// by the anchor.
const ANCHOR_TOLERANCE: f64 = 1e-9;

/// Widening factors for the default curve domain.
const DOMAIN_LOWER_FACTOR: f64 = 0.5;
const DOMAIN_UPPER_FACTOR: f64 = 1.5;

/// How each curve sample is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveMode {
    /// Intrinsic value at expiration.
    #[default]
    AtExpiration,
    /// Black-Scholes value at the remaining time to expiry.
    MarkToModel,
}

/// One sample of a P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPoint {
    /// Underlying price.
    pub price: f64,
    /// Strategy P&L in dollars at that price.
    pub pnl: f64,
}

/// A sampled P&L curve, sorted by ascending price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlCurve {
    /// Valuation mode used for every point.
    pub mode: CurveMode,
    /// Samples in ascending price order.
    pub points: Vec<PnlPoint>,
}

impl PnlCurve {
    /// Sample with the highest P&L (first one on ties).
    #[must_use]
    pub fn max_point(&self) -> Option<PnlPoint> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.pnl > best.pnl { p } else { best })
    }

    /// Sample with the lowest P&L (first one on ties).
    #[must_use]
    pub fn min_point(&self) -> Option<PnlPoint> {
        self.points
            .iter()
            .copied()
            .reduce(|worst, p| if p.pnl < worst.pnl { p } else { worst })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Price domain and sampling step of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSpec {
    /// Lowest sampled price (>= 0).
    pub price_min: f64,
    /// Highest sampled price (> `price_min`).
    pub price_max: f64,
    /// Distance between grid samples (> 0).
    pub step: f64,
}

impl CurveSpec {
    /// Create a curve spec.
    #[must_use]
    pub const fn new(price_min: f64, price_max: f64, step: f64) -> Self {
        Self {
            price_min,
            price_max,
            step,
        }
    }

    /// Default domain around spot and the strategy's strikes, split into
    /// `intervals` equal steps.
    ///
    /// The domain is `[0.5 * low, 1.5 * high]` over spot and strikes,
    /// widened further when a breakeven lies in a linear tail beyond it.
    #[must_use]
    pub fn around(strategy: &StrategyInstance, spot: f64, intervals: usize) -> Self {
        let (low, high) = strategy
            .legs
            .iter()
            .map(|l| l.strike)
            .fold((spot, spot), |(lo, hi), k| (lo.min(k), hi.max(k)));

        let mut price_min = (low * DOMAIN_LOWER_FACTOR).max(0.0);
        let mut price_max = high * DOMAIN_UPPER_FACTOR;
        let (lower_root, upper_root) = tail_roots(strategy);
        if let Some(root) = lower_root.filter(|r| *r <= price_min) {
            price_min = root * DOMAIN_LOWER_FACTOR;
        }
        if let Some(root) = upper_root.filter(|r| *r >= price_max) {
            price_max = root * DOMAIN_UPPER_FACTOR;
        }
        let step = (price_max - price_min) / intervals.max(1) as f64;
        Self::new(price_min, price_max, step)
    }

    /// Check the domain and the resulting sample count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative or non-finite bound, an empty
    /// domain, a non-positive step, or more than [`MAX_CURVE_SAMPLES`] samples.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(self.price_min.is_finite() && self.price_min >= 0.0) {
            return Err(AnalyticsError::invalid_request(
                "curve.priceMin",
                format!("must be non-negative, got {}", self.price_min),
            ));
        }
        if !(self.price_max.is_finite() && self.price_max > self.price_min) {
            return Err(AnalyticsError::invalid_request(
                "curve.priceMax",
                format!(
                    "must exceed priceMin ({}), got {}",
                    self.price_min, self.price_max
                ),
            ));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(AnalyticsError::invalid_request(
                "curve.step",
                format!("must be positive, got {}", self.step),
            ));
        }

        let intervals = ((self.price_max - self.price_min) / self.step).floor();
        if intervals >= MAX_CURVE_SAMPLES as f64 {
            return Err(AnalyticsError::invalid_request(
                "curve.step",
                format!(
                    "domain [{}, {}] at step {} exceeds {MAX_CURVE_SAMPLES} samples",
                    self.price_min, self.price_max, self.step
                ),
            ));
        }
        Ok(())
    }

    /// Grid prices `price_min + i * step` up to and including `price_max`.
    fn grid(&self) -> impl Iterator<Item = f64> + '_ {
        let intervals = ((self.price_max - self.price_min) / self.step).floor() as usize;
        (0..=intervals)
            .map(move |i| (i as f64).mul_add(self.step, self.price_min))
            .filter(move |p| *p < self.price_max)
            .chain(std::iter::once(self.price_max))
    }
}

/// Breakevens in the linear segments below the lowest and above the highest
/// strike, if any.
fn tail_roots(strategy: &StrategyInstance) -> (Option<f64>, Option<f64>) {
    let strikes = strategy.strikes();
    let (Some(&lowest), Some(&highest)) = (strikes.first(), strikes.last()) else {
        return (None, None);
    };

    let at_zero = strategy.payoff_at_expiration(0.0);
    let at_lowest = strategy.payoff_at_expiration(lowest);
    let lower = ((at_zero < 0.0) != (at_lowest < 0.0) && at_zero != at_lowest)
        .then(|| lowest * at_zero / (at_zero - at_lowest));

    let slope = strategy.upper_tail_slope();
    let at_highest = strategy.payoff_at_expiration(highest);
    let upper = (slope != 0.0)
        .then(|| highest - at_highest / slope)
        .filter(|root| *root > highest);

    (lower, upper)
}

/// Dollar P&L of one leg at expiration.
#[must_use]
pub fn leg_payoff_at_expiration(leg: &Leg, price: f64) -> f64 {
    leg.exposure() * (leg.option_type.intrinsic_value(price, leg.strike) - leg.premium)
}

/// Dollar P&L of a set of legs at expiration.
#[must_use]
pub fn payoff_at_expiration(legs: &[Leg], price: f64) -> f64 {
    legs.iter().map(|l| leg_payoff_at_expiration(l, price)).sum()
}

impl StrategyInstance {
    /// Dollar P&L of the whole position at expiration, stock included.
    #[must_use]
    pub fn payoff_at_expiration(&self, price: f64) -> f64 {
        payoff_at_expiration(&self.legs, price)
            + self.stock.as_ref().map_or(0.0, |s| s.pnl_at(price))
    }
}

/// Dollar P&L of the position with every leg revalued by Black-Scholes at
/// the market's remaining time.
///
/// Expired or zero-volatility markets collapse to the at-expiration payoff.
#[must_use]
pub fn mark_to_model(strategy: &StrategyInstance, market: &MarketContext, price: f64) -> f64 {
    let tau = market.time_to_expiry();
    let legs: f64 = strategy
        .legs
        .iter()
        .map(|leg| {
            let value = black_scholes::price(
                leg.option_type,
                price,
                leg.strike,
                market.risk_free_rate,
                market.dividend_yield,
                market.implied_volatility,
                tau,
            );
            leg.exposure() * (value - leg.premium)
        })
        .sum();
    legs + strategy.stock.as_ref().map_or(0.0, |s| s.pnl_at(price))
}

/// Sample the strategy's P&L over `spec`.
///
/// The domain widens to include spot and every strike; those anchors are
/// always sampled exactly.
///
/// # Errors
///
/// Returns `InvalidInput` for an invalid strategy, market or curve spec.
pub fn generate_curve(
    strategy: &StrategyInstance,
    market: &MarketContext,
    spec: &CurveSpec,
    mode: CurveMode,
) -> Result<PnlCurve, AnalyticsError> {
    validate_strategy(strategy)?;
    validate_market(market)?;
    spec.validate()?;

    let mut anchors = strategy.strikes();
    anchors.push(market.spot);

    let mut prices: Vec<f64> = spec
        .grid()
        .filter(|p| !anchors.iter().any(|a| (a - p).abs() <= ANCHOR_TOLERANCE))
        .chain(anchors.iter().copied())
        .collect();
    prices.sort_by(f64::total_cmp);
    prices.dedup();

    let points = prices
        .into_iter()
        .map(|price| {
            let pnl = match mode {
                CurveMode::AtExpiration => strategy.payoff_at_expiration(price),
                CurveMode::MarkToModel => mark_to_model(strategy, market, price),
            };
            PnlPoint { price, pnl }
        })
        .collect();

    Ok(PnlCurve { mode, points })
}
