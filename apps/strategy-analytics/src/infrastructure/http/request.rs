//! HTTP request DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::error::AnalyticsError;
use crate::optimizer::OptimizerRequest;
use crate::options::{MarketContext, OptionType, StrategyInstance};
use crate::strategy::{CurveMode, CurveSpec};

/// Market snapshot as sent by clients.
///
/// Either `daysToExpiry` or `expiration` must be present; rate and yield
/// fall back to the pricing configuration. `impliedVolatility` is required
/// everywhere except when it is the quantity being solved for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRequest {
    /// Underlying price.
    pub spot: f64,
    /// Annualized implied volatility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
    /// Calendar days to expiration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<i64>,
    /// Expiration date (YYYY-MM-DD), used when `daysToExpiry` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NaiveDate>,
    /// Annualized risk-free rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<f64>,
    /// Continuous dividend yield.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
}

impl MarketRequest {
    /// Resolve into a `MarketContext` as of `today`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `impliedVolatility` is missing or when
    /// neither `daysToExpiry` nor `expiration` is set.
    pub fn resolve(
        &self,
        pricing: &PricingConfig,
        today: NaiveDate,
    ) -> Result<MarketContext, AnalyticsError> {
        let sigma = self.implied_volatility.ok_or_else(|| {
            AnalyticsError::invalid_market("impliedVolatility", "impliedVolatility is required")
        })?;
        self.resolve_with_volatility(pricing, today, sigma)
    }

    /// Resolve for pricing a quote whose volatility is unknown; a missing
    /// `impliedVolatility` becomes zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when neither `daysToExpiry` nor `expiration` is set.
    pub fn resolve_for_quote(
        &self,
        pricing: &PricingConfig,
        today: NaiveDate,
    ) -> Result<MarketContext, AnalyticsError> {
        self.resolve_with_volatility(pricing, today, self.implied_volatility.unwrap_or(0.0))
    }

    fn resolve_with_volatility(
        &self,
        pricing: &PricingConfig,
        today: NaiveDate,
        sigma: f64,
    ) -> Result<MarketContext, AnalyticsError> {
        let days = match (self.days_to_expiry, self.expiration) {
            (Some(days), _) => days,
            (None, Some(expiration)) => MarketContext::days_until(today, expiration),
            (None, None) => {
                return Err(AnalyticsError::invalid_market(
                    "daysToExpiry",
                    "daysToExpiry or expiration is required",
                ));
            }
        };

        Ok(MarketContext::new(
            self.spot,
            sigma,
            days,
            self.risk_free_rate.unwrap_or(pricing.risk_free_rate),
        )
        .with_dividend_yield(
            self.dividend_yield
                .unwrap_or(pricing.default_dividend_yield),
        ))
    }
}

/// Request for a sampled P&L curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffRequest {
    /// Strategy to evaluate.
    pub strategy: StrategyInstance,
    /// Market snapshot.
    pub market: MarketRequest,
    /// Price domain; derived from spot and strikes when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveSpec>,
    /// Valuation mode (at expiration by default).
    #[serde(default)]
    pub mode: CurveMode,
}

/// Request for strategy metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    /// Strategy to evaluate.
    pub strategy: StrategyInstance,
    /// Market snapshot.
    pub market: MarketRequest,
}

/// Request for ranked strategy candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Market snapshot.
    pub market: MarketRequest,
    /// Sentiment, target, budget and ranking.
    pub request: OptimizerRequest,
}

/// Request to back out volatility from an observed premium.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpliedVolatilityRequest {
    /// Call or put.
    pub option_type: OptionType,
    /// Observed premium per share.
    pub premium: f64,
    /// Strike price.
    pub strike: f64,
    /// Market snapshot (its volatility is ignored).
    pub market: MarketRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn market_request_defaults_from_config() {
        let request: MarketRequest = serde_json::from_str(
            r#"{"spot": 100.0, "impliedVolatility": 0.2, "daysToExpiry": 30}"#,
        )
        .unwrap();
        let pricing = PricingConfig {
            risk_free_rate: 0.03,
            default_dividend_yield: 0.01,
        };
        let market = request.resolve(&pricing, today()).unwrap();

        assert_eq!(market.days_to_expiry, 30);
        assert!((market.risk_free_rate - 0.03).abs() < f64::EPSILON);
        assert!((market.dividend_yield - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn market_request_expiration_date() {
        let request: MarketRequest = serde_json::from_str(
            r#"{"spot": 100.0, "impliedVolatility": 0.2, "expiration": "2026-04-17", "riskFreeRate": 0.045}"#,
        )
        .unwrap();
        let market = request.resolve(&PricingConfig::default(), today()).unwrap();

        assert_eq!(market.days_to_expiry, 46);
        assert!((market.risk_free_rate - 0.045).abs() < f64::EPSILON);
    }

    #[test]
    fn market_request_requires_expiry() {
        let request: MarketRequest =
            serde_json::from_str(r#"{"spot": 100.0, "impliedVolatility": 0.2}"#).unwrap();
        let err = request
            .resolve(&PricingConfig::default(), today())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMarket);
    }

    #[test]
    fn market_request_requires_volatility() {
        let request: MarketRequest =
            serde_json::from_str(r#"{"spot": 100.0, "daysToExpiry": 30}"#).unwrap();
        let err = request
            .resolve(&PricingConfig::default(), today())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMarket);
        assert_eq!(
            err.to_http_response().details.get("field").map(String::as_str),
            Some("impliedVolatility")
        );

        let market = request
            .resolve_for_quote(&PricingConfig::default(), today())
            .unwrap();
        assert_eq!(market.implied_volatility, 0.0);
    }

    #[test]
    fn payoff_request_defaults_mode() {
        let request: PayoffRequest = serde_json::from_str(
            r#"{
                "strategy": {
                    "id": "lc",
                    "name": "Long Call",
                    "legs": [{"optionType": "call", "action": "buy", "strike": 95.0, "quantity": 1, "premium": 5.0}]
                },
                "market": {"spot": 100.0, "impliedVolatility": 0.2, "daysToExpiry": 30}
            }"#,
        )
        .unwrap();
        assert_eq!(request.mode, CurveMode::AtExpiration);
        assert!(request.curve.is_none());
        assert_eq!(request.strategy.legs[0].multiplier, 100);
    }
}
