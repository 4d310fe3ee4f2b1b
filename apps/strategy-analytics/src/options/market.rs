//! Market snapshot supplied by the market-data collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar days per year used to annualise days-to-expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Read-only market snapshot for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    /// Underlying spot price.
    pub spot: f64,
    /// Annualized implied volatility (0.25 = 25%).
    pub implied_volatility: f64,
    /// Calendar days until the strategy's common expiration.
    pub days_to_expiry: i64,
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Continuous dividend (carry) yield.
    #[serde(default)]
    pub dividend_yield: f64,
}

impl MarketContext {
    /// Create a market snapshot without a dividend yield.
    #[must_use]
    pub const fn new(
        spot: f64,
        implied_volatility: f64,
        days_to_expiry: i64,
        risk_free_rate: f64,
    ) -> Self {
        Self {
            spot,
            implied_volatility,
            days_to_expiry,
            risk_free_rate,
            dividend_yield: 0.0,
        }
    }

    /// Set the dividend yield.
    #[must_use]
    pub const fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Time to expiry in years (may be zero or negative once expired).
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        self.days_to_expiry as f64 / DAYS_PER_YEAR
    }

    /// Calendar days from `as_of` until `expiration` (negative once past).
    #[must_use]
    pub fn days_until(as_of: NaiveDate, expiration: NaiveDate) -> i64 {
        (expiration - as_of).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_expiry() {
        let market = MarketContext::new(100.0, 0.2, 73, 0.05);
        assert!((market.time_to_expiry() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_days_until() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let expiration = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        assert_eq!(MarketContext::days_until(as_of, expiration), 14);
        assert_eq!(MarketContext::days_until(expiration, as_of), -14);
    }

    #[test]
    fn test_dividend_yield_defaults_to_zero() {
        let json = r#"{"spot":100.0,"impliedVolatility":0.3,"daysToExpiry":30,"riskFreeRate":0.04}"#;
        let market: MarketContext = serde_json::from_str(json).unwrap();
        assert_eq!(market, MarketContext::new(100.0, 0.3, 30, 0.04));
    }
}
