//! Input validation.
//!
//! Rejects structurally invalid strategies and market snapshots before any
//! computation. Zero or negative volatility and non-positive days to expiry
//! are accepted: they are degenerate states the pricer handles explicitly.

use crate::error::AnalyticsError;
use crate::options::{MarketContext, StrategyInstance};

/// Validate a strategy's legs and stock position.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty leg list, a non-positive strike,
/// quantity or multiplier, a negative premium, or a non-positive cost basis.
pub fn validate_strategy(strategy: &StrategyInstance) -> Result<(), AnalyticsError> {
    if strategy.legs.is_empty() {
        return Err(AnalyticsError::invalid_strategy(
            "legs",
            "at least one leg is required",
        ));
    }

    for (i, leg) in strategy.legs.iter().enumerate() {
        if !(leg.strike.is_finite() && leg.strike > 0.0) {
            return Err(AnalyticsError::invalid_strategy(
                format!("legs[{i}].strike"),
                format!("must be positive, got {}", leg.strike),
            ));
        }
        if leg.quantity == 0 {
            return Err(AnalyticsError::invalid_strategy(
                format!("legs[{i}].quantity"),
                "must be at least 1",
            ));
        }
        if !(leg.premium.is_finite() && leg.premium >= 0.0) {
            return Err(AnalyticsError::invalid_strategy(
                format!("legs[{i}].premium"),
                format!("must be non-negative, got {}", leg.premium),
            ));
        }
        if leg.multiplier == 0 {
            return Err(AnalyticsError::invalid_strategy(
                format!("legs[{i}].multiplier"),
                "must be at least 1",
            ));
        }
    }

    if let Some(stock) = &strategy.stock {
        if !(stock.cost_basis.is_finite() && stock.cost_basis > 0.0) {
            return Err(AnalyticsError::invalid_strategy(
                "stock.costBasis",
                format!("must be positive, got {}", stock.cost_basis),
            ));
        }
    }

    Ok(())
}

/// Validate a market snapshot.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-positive spot or any non-finite field.
pub fn validate_market(market: &MarketContext) -> Result<(), AnalyticsError> {
    if !(market.spot.is_finite() && market.spot > 0.0) {
        return Err(AnalyticsError::invalid_market(
            "spot",
            format!("must be positive, got {}", market.spot),
        ));
    }

    let finite_fields = [
        ("impliedVolatility", market.implied_volatility),
        ("riskFreeRate", market.risk_free_rate),
        ("dividendYield", market.dividend_yield),
    ];
    for (field, value) in finite_fields {
        if !value.is_finite() {
            return Err(AnalyticsError::invalid_market(
                field,
                format!("must be finite, got {value}"),
            ));
        }
    }

    Ok(())
}
