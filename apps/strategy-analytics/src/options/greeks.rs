//! Greeks value object and aggregation.
//!
//! Per-share greeks come from the Black-Scholes pricer; strategy-level
//! greeks scale each leg by its signed quantity times multiplier and sum.

use serde::{Deserialize, Serialize};

/// Greeks for an option or a whole strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option value with respect to the underlying.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to the underlying.
    pub gamma: f64,
    /// Theta - change in value per calendar day.
    /// Typically negative for long options.
    pub theta: f64,
    /// Vega - change in value per 1 percentage point of implied volatility.
    pub vega: f64,
    /// Rho - change in value per 1 percentage point of the risk-free rate.
    pub rho: f64,
}

impl Greeks {
    /// Create new Greeks.
    #[must_use]
    pub const fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Create zero Greeks.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Scale Greeks by a signed exposure (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }

    /// Add another Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

/// Sum `(greeks, exposure)` pairs into one aggregate.
#[must_use]
pub fn aggregate_greeks<I>(positions: I) -> Greeks
where
    I: IntoIterator<Item = (Greeks, f64)>,
{
    positions
        .into_iter()
        .fold(Greeks::zero(), |acc, (greeks, exposure)| {
            acc.add(&greeks.scale(exposure))
        })
}
