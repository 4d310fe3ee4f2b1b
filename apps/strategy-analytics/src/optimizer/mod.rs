//! Strategy optimizer.
//!
//! Turns a sentiment, target price and budget into a ranked list of priced
//! strategies. The pipeline runs once, front to back:
//!
//! 1. Catalog filter by sentiment
//! 2. Strike selection on the listed-strike grid
//! 3. Leg pricing with Black-Scholes, rounded to cents
//! 4. Budget filter on required capital
//! 5. Metrics and payoff curve per survivor (parallel)
//! 6. Ranking and truncation to the top N
//!
//! An empty result is a valid outcome, not an error.

mod catalog;
mod ranking;
mod strikes;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AnalyticsError;
use crate::observability::{record_optimizer_candidates, record_optimizer_run};
use crate::options::{DEFAULT_MULTIPLIER, Leg, MarketContext, StockPosition, StrategyInstance};
use crate::pricing::black_scholes;
use crate::strategy::{
    DEFAULT_CURVE_INTERVALS, StrategyMetrics, capital_requirement, validate_market,
};

pub use catalog::{Sentiment, StrategyTemplate, templates_for};
pub use ranking::{RankedStrategy, RankingMode, rank};
pub use strikes::{LegPlan, StrikeInputs, select_strikes, snap, strike_increment};

/// Budget comparisons tolerate this much rounding.
const BUDGET_TOLERANCE: f64 = 1e-9;

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Results returned when the request does not say.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Shares per generated contract.
    #[serde(default = "default_contract_multiplier")]
    pub contract_multiplier: u32,
    /// Fixed strike spacing; derived from spot when absent.
    #[serde(default)]
    pub strike_increment: Option<f64>,
    /// Evaluate candidates on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            contract_multiplier: default_contract_multiplier(),
            strike_increment: None,
            parallel: default_parallel(),
        }
    }
}

const fn default_top_n() -> usize {
    5
}
const fn default_contract_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}
const fn default_parallel() -> bool {
    true
}

/// What the trader asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerRequest {
    /// Market view.
    pub sentiment: Sentiment,
    /// Expected underlying price at expiration.
    pub target_price: f64,
    /// Maximum capital to commit.
    pub budget: f64,
    /// Ranking objective.
    #[serde(default)]
    pub ranking: RankingMode,
    /// Number of results; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}

impl OptimizerRequest {
    /// Create a request with the default ranking and result count.
    #[must_use]
    pub const fn new(sentiment: Sentiment, target_price: f64, budget: f64) -> Self {
        Self {
            sentiment,
            target_price,
            budget,
            ranking: RankingMode::MaxReturn,
            top_n: None,
        }
    }

    /// Set the ranking objective.
    #[must_use]
    pub const fn with_ranking(mut self, ranking: RankingMode) -> Self {
        self.ranking = ranking;
        self
    }

    /// Set the result count.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Check request parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive target, a negative budget or
    /// a zero result count.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(self.target_price.is_finite() && self.target_price > 0.0) {
            return Err(AnalyticsError::invalid_request(
                "targetPrice",
                format!("must be positive, got {}", self.target_price),
            ));
        }
        if !(self.budget.is_finite() && self.budget >= 0.0) {
            return Err(AnalyticsError::invalid_request(
                "budget",
                format!("must be non-negative, got {}", self.budget),
            ));
        }
        if self.top_n == Some(0) {
            return Err(AnalyticsError::invalid_request("topN", "must be at least 1"));
        }
        Ok(())
    }
}

/// Ranks generated strategies for optimizer requests.
#[derive(Debug, Clone)]
pub struct StrategyOptimizer {
    config: OptimizerConfig,
    curve_intervals: usize,
}

impl Default for StrategyOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl StrategyOptimizer {
    /// Create an optimizer.
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            curve_intervals: DEFAULT_CURVE_INTERVALS,
        }
    }

    /// Override the number of intervals in each result curve.
    #[must_use]
    pub const fn with_curve_intervals(mut self, intervals: usize) -> Self {
        self.curve_intervals = intervals;
        self
    }

    /// Run the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid market or request. Finding no
    /// candidate is not an error.
    #[tracing::instrument(
        skip_all,
        fields(sentiment = %request.sentiment, ranking = %request.ranking, budget = request.budget)
    )]
    pub fn optimize(
        &self,
        market: &MarketContext,
        request: &OptimizerRequest,
    ) -> Result<Vec<RankedStrategy>, AnalyticsError> {
        validate_market(market)?;
        request.validate()?;
        if let Some(increment) = self.config.strike_increment {
            if !(increment.is_finite() && increment > 0.0) {
                return Err(AnalyticsError::invalid_request(
                    "optimizer.strikeIncrement",
                    format!("must be positive, got {increment}"),
                ));
            }
        }
        record_optimizer_run(request.sentiment.as_str(), request.ranking.as_str());

        let templates = templates_for(request.sentiment);
        record_optimizer_candidates("catalog", templates.len());

        let inputs =
            StrikeInputs::new(market.spot, request.target_price, self.config.strike_increment);
        let priced: Vec<StrategyInstance> = templates
            .into_iter()
            .filter_map(|template| {
                let legs = select_strikes(template, &inputs)?;
                Some(self.build(template, &legs, market))
            })
            .collect();
        record_optimizer_candidates("priced", priced.len());

        let affordable: Vec<(StrategyInstance, f64)> = priced
            .into_iter()
            .filter_map(|strategy| {
                let capital = capital_requirement(&strategy)?;
                (capital <= request.budget + BUDGET_TOLERANCE).then_some((strategy, capital))
            })
            .collect();
        record_optimizer_candidates("budget", affordable.len());
        debug!(
            atm = inputs.atm,
            target = inputs.target,
            distance = inputs.distance,
            affordable = affordable.len(),
            "Candidates within budget"
        );

        let evaluate = |(strategy, capital): (StrategyInstance, f64)| {
            let (metrics, curve) =
                StrategyMetrics::compute_with_intervals(&strategy, market, self.curve_intervals)?;
            Ok::<_, AnalyticsError>(RankedStrategy {
                strategy,
                metrics,
                curve,
                required_capital: capital,
            })
        };
        let mut ranked: Vec<RankedStrategy> = if self.config.parallel {
            affordable.into_par_iter().map(evaluate).collect::<Result<_, _>>()?
        } else {
            affordable.into_iter().map(evaluate).collect::<Result<_, _>>()?
        };

        rank(&mut ranked, request.ranking);
        ranked.truncate(request.top_n.unwrap_or(self.config.top_n));
        record_optimizer_candidates("ranked", ranked.len());

        info!(
            results = ranked.len(),
            best = ranked.first().map_or("none", |r| r.strategy.name.as_str()),
            "Optimizer run complete"
        );
        Ok(ranked)
    }

    /// Price each planned leg at the current market and assemble the strategy.
    fn build(
        &self,
        template: StrategyTemplate,
        plans: &[LegPlan],
        market: &MarketContext,
    ) -> StrategyInstance {
        let tau = market.time_to_expiry();
        let legs = plans
            .iter()
            .map(|plan| {
                let premium = black_scholes::price(
                    plan.option_type,
                    market.spot,
                    plan.strike,
                    market.risk_free_rate,
                    market.dividend_yield,
                    market.implied_volatility,
                    tau,
                );
                Leg::new(
                    plan.option_type,
                    plan.action,
                    plan.strike,
                    plan.quantity,
                    round_to_cents(premium),
                )
                .with_multiplier(self.config.contract_multiplier)
            })
            .collect();

        let strikes = plans
            .iter()
            .map(|p| p.strike.to_string())
            .collect::<Vec<_>>()
            .join("/");
        let strategy = StrategyInstance::new(
            format!("{}-{strikes}", template.slug()),
            template.name(),
            legs,
        );

        match template {
            StrategyTemplate::CoveredCall => strategy.with_stock(StockPosition::new(
                i64::from(self.config.contract_multiplier),
                round_to_cents(market.spot),
            )),
            _ => strategy,
        }
    }
}

/// Run the optimizer with the given settings.
///
/// # Errors
///
/// Returns `InvalidInput` for an invalid market or request.
pub fn optimize(
    market: &MarketContext,
    request: &OptimizerRequest,
    config: &OptimizerConfig,
) -> Result<Vec<RankedStrategy>, AnalyticsError> {
    StrategyOptimizer::new(config.clone()).optimize(market, request)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
