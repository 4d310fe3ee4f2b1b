//! Option pricing and probability primitives.
//!
//! This module provides:
//! - The shared standard normal distribution
//! - Black-Scholes-Merton prices and greeks for one leg
//! - Risk-neutral probabilities of price outcomes
//! - Implied volatility computation (Newton-Raphson, bisection, hybrid)
//!
//! # Example
//!
//! ```
//! use strategy_analytics::options::OptionType;
//! use strategy_analytics::pricing::{black_scholes, probability_above};
//!
//! let call = black_scholes::price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
//! assert!(call > 10.0 && call < 11.0);
//!
//! let p = probability_above(100.0, 120.0, 0.2, 1.0, 0.05, 0.0);
//! assert!(p > 0.0 && p < 0.5);
//! ```

pub mod black_scholes;
mod iv;
mod normal;
mod probability;

pub use iv::{IvError, IvSolver, IvSolverConfig, OptionQuote};
pub use normal::{norm_cdf, norm_pdf};
pub use probability::{
    probability_above, probability_below, probability_between, probability_of_profit,
};
