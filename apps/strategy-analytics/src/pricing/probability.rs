//! Risk-neutral probability of underlying price outcomes.
//!
//! Terminal prices are lognormal under the pricing measure, so
//! `P(S_T > K) = N(d2)` with the same `d2` the pricer uses. These are
//! model probabilities for ranking strategies, not market forecasts.

// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::suboptimal_flops)]

use super::normal::norm_cdf;

/// Probability used when volatility or time has collapsed.
const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Probability that the underlying finishes above `target`.
///
/// Returns `0.5` for `sigma <= 0` or `tau <= 0` and `1.0` for a
/// non-positive target. Never NaN.
#[must_use]
pub fn probability_above(spot: f64, target: f64, sigma: f64, tau: f64, r: f64, q: f64) -> f64 {
    if target <= 0.0 {
        return 1.0;
    }
    if target.is_infinite() {
        return 0.0;
    }
    let inputs_finite = [spot, target, sigma, tau, r, q].iter().all(|v| v.is_finite());
    if !inputs_finite || spot <= 0.0 || sigma <= 0.0 || tau <= 0.0 {
        return NEUTRAL_PROBABILITY;
    }

    let sqrt_tau = tau.sqrt();
    let d2 = ((spot / target).ln() + (r - q - 0.5 * sigma * sigma) * tau) / (sigma * sqrt_tau);
    norm_cdf(d2).clamp(0.0, 1.0)
}

/// Probability that the underlying finishes below `target`.
#[must_use]
pub fn probability_below(spot: f64, target: f64, sigma: f64, tau: f64, r: f64, q: f64) -> f64 {
    1.0 - probability_above(spot, target, sigma, tau, r, q)
}

/// Probability that the underlying finishes between `lower` and `upper`.
#[must_use]
pub fn probability_between(
    spot: f64,
    lower: f64,
    upper: f64,
    sigma: f64,
    tau: f64,
    r: f64,
    q: f64,
) -> f64 {
    if upper <= lower {
        return 0.0;
    }
    let mass = probability_above(spot, lower, sigma, tau, r, q)
        - probability_above(spot, upper, sigma, tau, r, q);
    mass.clamp(0.0, 1.0)
}

/// Probability that a strategy finishes profitable.
///
/// `breakevens` must be ascending. The positive half-line is cut at the
/// breakevens; each interval is sampled at an interior point with `payoff`,
/// and the probability mass of every profitable interval is summed.
///
/// With `sigma <= 0` or `tau <= 0` every finite breakeven has neutral
/// probability 0.5, so bounded intervals carry no mass and only the two
/// unbounded ones contribute: an expired long call scores 0.5 while an
/// expired iron condor with spot inside its profit zone scores 0.
#[must_use]
pub fn probability_of_profit<F>(
    breakevens: &[f64],
    payoff: F,
    spot: f64,
    sigma: f64,
    tau: f64,
    r: f64,
    q: f64,
) -> f64
where
    F: Fn(f64) -> f64,
{
    if breakevens.is_empty() {
        return if payoff(spot) > 0.0 { 1.0 } else { 0.0 };
    }

    let mut edges = Vec::with_capacity(breakevens.len() + 2);
    edges.push(0.0);
    edges.extend(breakevens.iter().copied().filter(|b| *b > 0.0));
    edges.push(f64::INFINITY);

    let total: f64 = edges
        .windows(2)
        .filter(|w| payoff(interior_price(w[0], w[1])) > 0.0)
        .map(|w| probability_between(spot, w[0], w[1], sigma, tau, r, q))
        .sum();

    // An empty sum is -0.0
    total.clamp(0.0, 1.0) + 0.0
}

/// A price strictly inside `(lower, upper)`; `upper` may be infinite.
fn interior_price(lower: f64, upper: f64) -> f64 {
    if upper.is_infinite() {
        lower + lower.max(1.0)
    } else {
        lower.midpoint(upper)
    }
}
