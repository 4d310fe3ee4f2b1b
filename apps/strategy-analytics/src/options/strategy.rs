//! Strategy instance: a named set of same-expiration legs.

use serde::{Deserialize, Serialize};

use super::leg::{Leg, StockPosition};
use super::types::OptionType;

/// A complete options strategy as supplied by the caller.
///
/// All legs share one expiration; the remaining time is carried by the
/// `MarketContext` the strategy is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInstance {
    /// Caller-assigned identifier.
    pub id: String,
    /// Display name (e.g. "Bull Call Spread").
    pub name: String,
    /// Option legs (at least one).
    pub legs: Vec<Leg>,
    /// Optional underlying share position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockPosition>,
}

impl StrategyInstance {
    /// Create a strategy from option legs only.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, legs: Vec<Leg>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            legs,
            stock: None,
        }
    }

    /// Attach an underlying share position.
    #[must_use]
    pub fn with_stock(mut self, stock: StockPosition) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Net premium across legs (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        self.legs.iter().map(Leg::net_premium).sum()
    }

    /// Distinct strikes in ascending order.
    #[must_use]
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.legs.iter().map(|l| l.strike).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    /// Slope of the at-expiration payoff above the highest strike
    /// (dollars of P&L per dollar of underlying).
    ///
    /// Every call is in the money there and every put is worthless.
    #[must_use]
    pub fn upper_tail_slope(&self) -> f64 {
        let calls: f64 = self
            .legs
            .iter()
            .filter(|l| l.option_type == OptionType::Call)
            .map(Leg::exposure)
            .sum();
        calls + self.stock.as_ref().map_or(0.0, |s| s.shares as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_premium_iron_condor() {
        let strategy = StrategyInstance::new(
            "ic",
            "Iron Condor",
            vec![
                Leg::buy_put(445.0, 0.50),
                Leg::sell_put(450.0, 1.50),
                Leg::sell_call(470.0, 1.40),
                Leg::buy_call(475.0, 0.40),
            ],
        );

        // Net credit = (1.50 - 0.50 + 1.40 - 0.40) * 100 = $200
        assert!((strategy.net_premium() - 200.0).abs() < 1e-9);
        assert_eq!(strategy.strikes(), vec![445.0, 450.0, 470.0, 475.0]);
        assert!(strategy.upper_tail_slope().abs() < 1e-12);
    }

    #[test]
    fn test_upper_tail_slope_with_stock() {
        let covered_call = StrategyInstance::new("cc", "Covered Call", vec![Leg::sell_call(105.0, 2.0)])
            .with_stock(StockPosition::new(100, 100.0));
        assert!(covered_call.upper_tail_slope().abs() < 1e-12);

        let long_call = StrategyInstance::new("lc", "Long Call", vec![Leg::buy_call(95.0, 5.0)]);
        assert!((long_call.upper_tail_slope() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_strikes_are_deduplicated() {
        let straddle = StrategyInstance::new(
            "st",
            "Long Straddle",
            vec![Leg::buy_call(100.0, 4.0), Leg::buy_put(100.0, 3.5)],
        );
        assert_eq!(straddle.strikes(), vec![100.0]);
    }
}
