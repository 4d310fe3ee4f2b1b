//! Implied volatility.
//!
//! Backs out the annualized volatility implied by an observed premium so a
//! `MarketContext` can be built from a quoted leg. Near the money the solver
//! runs Newton-Raphson from a Corrado-Miller seed; far from the money, where
//! vega is tiny, or whenever Newton stalls, it bisects the volatility bounds.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use std::f64::consts::PI;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{MarketContext, OptionType};

use super::black_scholes::{price, raw_vega};

/// Seed used when the Corrado-Miller approximation has no real root.
const FALLBACK_SEED: f64 = 0.30;

/// Vega below which a Newton step is meaningless.
const MIN_VEGA: f64 = 1e-12;

/// Bracket width at which bisection stops.
const MIN_BRACKET: f64 = 1e-10;

/// Errors from IV computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IvError {
    /// Neither Newton-Raphson nor bisection reached the tolerance.
    #[error("No convergence after {iterations} iterations (price error {last_error:.6})")]
    ConvergenceFailed {
        /// Iterations attempted.
        iterations: u32,
        /// Absolute price error at the last iterate.
        last_error: f64,
    },

    /// The quote itself is unusable.
    #[error("Invalid quote: {message}")]
    InvalidInput {
        /// What is wrong with it.
        message: String,
    },

    /// No volatility in the configured bounds reproduces the premium.
    #[error("No volatility reproduces the premium: {reason}")]
    NoSolution {
        /// Why.
        reason: String,
    },
}

/// Solver tolerances and bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IvSolverConfig {
    /// Iteration cap for each method.
    pub max_iterations: u32,
    /// Absolute price error accepted as converged.
    pub tolerance: f64,
    /// Lower volatility bound.
    pub min_vol: f64,
    /// Upper volatility bound.
    pub max_vol: f64,
    /// `|ln(S/K)|` beyond which the solver bisects directly.
    pub hybrid_threshold: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            min_vol: 0.001,
            max_vol: 5.0,
            hybrid_threshold: 0.20,
        }
    }
}

/// One observed option premium with the market inputs needed to price it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionQuote {
    /// Call or put.
    pub option_type: OptionType,
    /// Observed premium per share.
    pub premium: f64,
    /// Underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Years to expiration.
    pub tau: f64,
    /// Risk-free rate.
    pub rate: f64,
    /// Dividend yield.
    pub dividend_yield: f64,
}

impl OptionQuote {
    /// Quote a premium against a market snapshot; its volatility is ignored.
    #[must_use]
    pub fn from_market(
        option_type: OptionType,
        premium: f64,
        strike: f64,
        market: &MarketContext,
    ) -> Self {
        Self {
            option_type,
            premium,
            spot: market.spot,
            strike,
            tau: market.time_to_expiry(),
            rate: market.risk_free_rate,
            dividend_yield: market.dividend_yield,
        }
    }

    fn model_price(&self, sigma: f64) -> f64 {
        price(
            self.option_type,
            self.spot,
            self.strike,
            self.rate,
            self.dividend_yield,
            sigma,
            self.tau,
        )
    }

    fn pricing_error(&self, sigma: f64) -> f64 {
        self.model_price(sigma) - self.premium
    }

    fn vega(&self, sigma: f64) -> f64 {
        raw_vega(
            self.spot,
            self.strike,
            self.rate,
            self.dividend_yield,
            sigma,
            self.tau,
        )
    }

    /// Zero-volatility value: the floor of any European premium.
    fn discounted_intrinsic(&self) -> f64 {
        let carried_spot = self.spot * (-self.dividend_yield * self.tau).exp();
        let pv_strike = self.strike * (-self.rate * self.tau).exp();
        match self.option_type {
            OptionType::Call => (carried_spot - pv_strike).max(0.0),
            OptionType::Put => (pv_strike - carried_spot).max(0.0),
        }
    }

    fn validate(&self) -> Result<(), IvError> {
        let checks = [
            ("premium", self.premium),
            ("spot", self.spot),
            ("strike", self.strike),
            ("time to expiry", self.tau),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(IvError::InvalidInput {
                    message: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if !(self.rate.is_finite() && self.dividend_yield.is_finite()) {
            return Err(IvError::InvalidInput {
                message: "rate and dividend yield must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Hybrid Newton-Raphson / bisection solver.
#[derive(Debug, Clone)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl Default for IvSolver {
    fn default() -> Self {
        Self::new(IvSolverConfig::default())
    }
}

impl IvSolver {
    /// Create a solver.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Volatility that reprices `quote`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive premium, spot, strike or expiry;
    /// `NoSolution` when the premium is outside the prices reachable within
    /// the volatility bounds; `ConvergenceFailed` otherwise.
    pub fn solve(&self, quote: &OptionQuote) -> Result<f64, IvError> {
        quote.validate()?;

        let floor = quote.discounted_intrinsic();
        if quote.premium < floor - self.config.tolerance {
            return Err(IvError::NoSolution {
                reason: format!(
                    "premium {:.4} is below discounted intrinsic value {floor:.4}",
                    quote.premium
                ),
            });
        }

        if (quote.spot / quote.strike).ln().abs() > self.config.hybrid_threshold {
            return self.bisect(quote);
        }
        self.newton(quote, self.seed(quote))
            .or_else(|_| self.bisect(quote))
    }

    /// Solve from decimal quotes for the premium and strike.
    ///
    /// # Errors
    ///
    /// As [`IvSolver::solve`], plus `InvalidInput` when a decimal has no
    /// `f64` representation.
    pub fn solve_decimal(
        &self,
        option_type: OptionType,
        premium: Decimal,
        strike: Decimal,
        market: &MarketContext,
    ) -> Result<Decimal, IvError> {
        let to_f64 = |value: Decimal, name: &str| {
            value.to_f64().ok_or_else(|| IvError::InvalidInput {
                message: format!("{name} {value} has no f64 representation"),
            })
        };
        let quote = OptionQuote::from_market(
            option_type,
            to_f64(premium, "premium")?,
            to_f64(strike, "strike")?,
            market,
        );

        let sigma = self.solve(&quote)?;
        Decimal::from_f64_retain(sigma).ok_or_else(|| IvError::NoSolution {
            reason: format!("volatility {sigma} has no decimal representation"),
        })
    }

    /// Corrado-Miller closed-form approximation, worked in call space.
    fn seed(&self, quote: &OptionQuote) -> f64 {
        let t = quote.tau;
        let k = quote.strike;
        let forward = quote.spot * ((quote.rate - quote.dividend_yield) * t).exp();
        let discount = (-quote.rate * t).exp();

        let call_premium = match quote.option_type {
            OptionType::Call => quote.premium,
            OptionType::Put => quote.premium + discount * (forward - k),
        };
        let moneyness = forward - k;
        let undiscounted = call_premium / discount;
        if undiscounted <= 0.0 {
            return FALLBACK_SEED;
        }

        let centred = undiscounted - 0.5 * moneyness;
        let radicand = centred.powi(2) - moneyness.powi(2) / PI;
        if radicand < 0.0 {
            return FALLBACK_SEED;
        }

        let sigma = (PI / (2.0 * t)).sqrt() * (centred + radicand.sqrt()) / forward;
        sigma.clamp(self.config.min_vol, self.config.max_vol)
    }

    fn newton(&self, quote: &OptionQuote, seed: f64) -> Result<f64, IvError> {
        let IvSolverConfig {
            max_iterations,
            tolerance,
            min_vol,
            max_vol,
            ..
        } = self.config;
        let mut sigma = seed.clamp(min_vol, max_vol);

        for iteration in 0..max_iterations {
            let error = quote.pricing_error(sigma);
            if error.abs() < tolerance {
                return Ok(sigma);
            }
            let vega = quote.vega(sigma);
            if vega.abs() < MIN_VEGA {
                return Err(IvError::ConvergenceFailed {
                    iterations: iteration,
                    last_error: error.abs(),
                });
            }
            sigma = (sigma - error / vega).clamp(min_vol, max_vol);
        }

        Err(IvError::ConvergenceFailed {
            iterations: max_iterations,
            last_error: quote.pricing_error(sigma).abs(),
        })
    }

    /// Bisection over `[min_vol, max_vol]`; price is increasing in sigma.
    fn bisect(&self, quote: &OptionQuote) -> Result<f64, IvError> {
        let (mut low, mut high) = (self.config.min_vol, self.config.max_vol);

        let cheapest = quote.model_price(low);
        let dearest = quote.model_price(high);
        if !(cheapest..=dearest).contains(&quote.premium) {
            return Err(IvError::NoSolution {
                reason: format!(
                    "premium {:.4} is outside [{cheapest:.4}, {dearest:.4}] for volatility in [{low}, {high}]",
                    quote.premium
                ),
            });
        }

        for _ in 0..self.config.max_iterations {
            let mid = low.midpoint(high);
            let error = quote.pricing_error(mid);
            if error.abs() < self.config.tolerance || high - low < MIN_BRACKET {
                return Ok(mid);
            }
            if error > 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        Err(IvError::ConvergenceFailed {
            iterations: self.config.max_iterations,
            last_error: quote.pricing_error(low.midpoint(high)).abs(),
        })
    }
}
