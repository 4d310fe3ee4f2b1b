//! Strategy leg types.
//!
//! A `Leg` is one option position; a `StockPosition` is the optional
//! underlying share position carried alongside the legs (covered calls,
//! protective puts, collars).

use serde::{Deserialize, Serialize};

use super::types::{LegAction, OptionType};

/// Standard equity option contract multiplier.
pub const DEFAULT_MULTIPLIER: u32 = 100;

const fn default_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}

/// A single option leg of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Call or put.
    pub option_type: OptionType,
    /// Buy (debit) or sell (credit).
    pub action: LegAction,
    /// Strike price.
    pub strike: f64,
    /// Number of contracts.
    pub quantity: u32,
    /// Premium per share paid or received at entry.
    pub premium: f64,
    /// Shares per contract.
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Leg {
    /// Create a new leg with the standard multiplier.
    #[must_use]
    pub const fn new(
        option_type: OptionType,
        action: LegAction,
        strike: f64,
        quantity: u32,
        premium: f64,
    ) -> Self {
        Self {
            option_type,
            action,
            strike,
            quantity,
            premium,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    /// One long call contract.
    #[must_use]
    pub const fn buy_call(strike: f64, premium: f64) -> Self {
        Self::new(OptionType::Call, LegAction::Buy, strike, 1, premium)
    }

    /// One short call contract.
    #[must_use]
    pub const fn sell_call(strike: f64, premium: f64) -> Self {
        Self::new(OptionType::Call, LegAction::Sell, strike, 1, premium)
    }

    /// One long put contract.
    #[must_use]
    pub const fn buy_put(strike: f64, premium: f64) -> Self {
        Self::new(OptionType::Put, LegAction::Buy, strike, 1, premium)
    }

    /// One short put contract.
    #[must_use]
    pub const fn sell_put(strike: f64, premium: f64) -> Self {
        Self::new(OptionType::Put, LegAction::Sell, strike, 1, premium)
    }

    /// Override the number of contracts.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Override the contract multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Signed contract count (positive for long, negative for short).
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        let qty = i64::from(self.quantity);
        match self.action {
            LegAction::Buy => qty,
            LegAction::Sell => -qty,
        }
    }

    /// Signed share exposure: `signed_quantity * multiplier`.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        (self.signed_quantity() * i64::from(self.multiplier)) as f64
    }

    /// Net premium (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        -self.exposure() * self.premium
    }
}

/// Shares of the underlying held alongside the option legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPosition {
    /// Number of shares (negative for a short position).
    pub shares: i64,
    /// Average entry price per share.
    pub cost_basis: f64,
}

impl StockPosition {
    /// Create a new stock position.
    #[must_use]
    pub const fn new(shares: i64, cost_basis: f64) -> Self {
        Self { shares, cost_basis }
    }

    /// Linear P&L at underlying price `price`.
    #[must_use]
    pub fn pnl_at(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.cost_basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_net_premium() {
        // Short leg = credit = 2.50 * 100 = $250
        let leg = Leg::sell_call(100.0, 2.50);
        assert!((leg.net_premium() - 250.0).abs() < 1e-9);

        // Long 3 contracts = debit
        let leg = Leg::buy_put(100.0, 1.25).with_quantity(3);
        assert!((leg.net_premium() + 375.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_quantity_and_exposure() {
        let leg = Leg::sell_put(50.0, 1.0).with_quantity(2).with_multiplier(10);
        assert_eq!(leg.signed_quantity(), -2);
        assert!((leg.exposure() + 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiplier_defaults_when_missing() {
        let json = r#"{"optionType":"call","action":"buy","strike":95.0,"quantity":1,"premium":4.2}"#;
        let leg: Leg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.multiplier, DEFAULT_MULTIPLIER);
        assert_eq!(leg, Leg::buy_call(95.0, 4.2));
    }

    #[test]
    fn test_stock_pnl() {
        let long = StockPosition::new(100, 50.0);
        assert!((long.pnl_at(55.0) - 500.0).abs() < 1e-9);

        let short = StockPosition::new(-100, 50.0);
        assert!((short.pnl_at(55.0) + 500.0).abs() < 1e-9);
    }
}
