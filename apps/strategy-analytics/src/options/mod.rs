//! Options value objects.
//!
//! This module provides:
//! - Option type and leg action enumerations
//! - Option legs and the optional underlying stock position
//! - Strategy instances and market snapshots
//! - Greeks aggregation for multi-leg strategies

mod greeks;
mod leg;
mod market;
mod strategy;
mod types;

pub use greeks::{Greeks, aggregate_greeks};
pub use leg::{DEFAULT_MULTIPLIER, Leg, StockPosition};
pub use market::{DAYS_PER_YEAR, MarketContext};
pub use strategy::StrategyInstance;
pub use types::{LegAction, OptionType};
