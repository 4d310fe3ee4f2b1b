//! Integration tests for the strategy optimizer.
//!
//! These tests run the full generate, price, filter and rank pipeline
//! against a fixed market snapshot.

use strategy_analytics::config::load_config_from_string;
use strategy_analytics::optimizer::{
    OptimizerRequest, RankingMode, Sentiment, StrategyOptimizer, StrategyTemplate,
};
use strategy_analytics::options::MarketContext;
use strategy_analytics::strategy::Extremum;

fn market() -> MarketContext {
    MarketContext::new(100.0, 0.3, 30, 0.05)
}

#[test]
fn test_neutral_request_only_proposes_neutral_templates() {
    let request = OptimizerRequest::new(Sentiment::Neutral, 100.0, 10_000.0).with_top_n(10);

    let ranked = StrategyOptimizer::default().optimize(&market(), &request).unwrap();

    assert!(!ranked.is_empty());
    let neutral: Vec<&str> = [
        StrategyTemplate::IronCondor,
        StrategyTemplate::IronButterfly,
        StrategyTemplate::LongCallButterfly,
    ]
    .iter()
    .map(|t| t.name())
    .collect();
    for candidate in &ranked {
        assert!(neutral.contains(&candidate.strategy.name.as_str()));
    }
}

#[test]
fn test_max_chance_orders_by_probability() {
    let request = OptimizerRequest::new(Sentiment::Bullish, 110.0, 50_000.0)
        .with_ranking(RankingMode::MaxChance)
        .with_top_n(10);

    let ranked = StrategyOptimizer::default().optimize(&market(), &request).unwrap();

    assert!(ranked.len() > 1);
    for pair in ranked.windows(2) {
        assert!(pair[0].metrics.probability_of_profit >= pair[1].metrics.probability_of_profit);
    }
}

#[test]
fn test_max_return_puts_unbounded_profit_first() {
    let request = OptimizerRequest::new(Sentiment::VeryBullish, 120.0, 50_000.0).with_top_n(10);

    let ranked = StrategyOptimizer::default().optimize(&market(), &request).unwrap();

    assert_eq!(ranked[0].strategy.name, StrategyTemplate::LongCall.name());
    assert!(matches!(ranked[0].metrics.max_profit, Extremum::Unbounded(_)));
}

#[test]
fn test_candidates_respect_budget_and_carry_curves() {
    let request = OptimizerRequest::new(Sentiment::Bearish, 90.0, 800.0).with_top_n(10);

    let ranked = StrategyOptimizer::default().optimize(&market(), &request).unwrap();

    for candidate in &ranked {
        assert!(candidate.required_capital <= 800.0);
        assert!(!candidate.curve.is_empty());
        let breakevens = &candidate.metrics.breakevens;
        assert!(breakevens.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_optimizer_from_yaml_config() {
    let config = load_config_from_string(
        r"
curve:
  intervals: 200
optimizer:
  top_n: 2
  contract_multiplier: 10
  strike_increment: 2.5
  parallel: false
",
    )
    .unwrap();
    let optimizer =
        StrategyOptimizer::new(config.optimizer).with_curve_intervals(config.curve.intervals);
    let request = OptimizerRequest::new(Sentiment::Neutral, 100.0, 10_000.0);

    let ranked = optimizer.optimize(&market(), &request).unwrap();

    assert_eq!(ranked.len(), 2);
    for candidate in &ranked {
        for leg in &candidate.strategy.legs {
            assert_eq!(leg.multiplier, 10);
            assert!((leg.strike / 2.5 - (leg.strike / 2.5).round()).abs() < 1e-9);
        }
    }
}
