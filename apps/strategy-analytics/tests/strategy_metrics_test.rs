//! Integration tests for strategy evaluation.
//!
//! These tests drive the public API end to end: JSON strategies in, curves
//! and metrics out.

use proptest::prelude::*;
use strategy_analytics::options::{Leg, MarketContext, StockPosition, StrategyInstance};
use strategy_analytics::strategy::{
    CurveMode, CurveSpec, Extremum, ReturnOnRisk, StrategyMetrics, capital_requirement,
    generate_curve,
};

fn market() -> MarketContext {
    MarketContext::new(100.0, 0.3, 30, 0.05)
}

#[test]
fn test_covered_call_is_bounded_both_ways() {
    let strategy = StrategyInstance::new("cc", "Covered Call", vec![Leg::sell_call(110.0, 3.0)])
        .with_stock(StockPosition::new(100, 100.0));

    let metrics = StrategyMetrics::compute(&strategy, &market()).unwrap();

    let max_profit = metrics.max_profit.finite().unwrap();
    assert!((max_profit - 1300.0).abs() < 1e-6);
    // Worst case is the stock going to zero, offset by the call premium
    assert_eq!(metrics.max_loss.finite(), Some(-9700.0));
    assert_eq!(metrics.breakevens.len(), 1);
    assert!((metrics.breakevens[0] - 97.0).abs() < 1e-6);
    let ratio = metrics.return_on_risk.ratio().unwrap();
    assert!((ratio - 1300.0 / 9700.0).abs() < 1e-9);
    // 100 shares of delta less the short call
    assert!(metrics.greeks.delta > 0.0 && metrics.greeks.delta < 100.0);
}

#[test]
fn test_long_straddle_profits_outside_breakevens() {
    let strategy = StrategyInstance::new(
        "straddle",
        "Long Straddle",
        vec![Leg::buy_call(100.0, 4.0), Leg::buy_put(100.0, 3.5)],
    );

    let metrics = StrategyMetrics::compute(&strategy, &market()).unwrap();

    assert!(matches!(metrics.max_profit, Extremum::Unbounded(_)));
    assert_eq!(metrics.max_loss.finite(), Some(-750.0));
    assert_eq!(metrics.return_on_risk, ReturnOnRisk::NotApplicable);
    assert_eq!(metrics.breakevens.len(), 2);
    assert!((metrics.breakevens[0] - 92.5).abs() < 1e-6);
    assert!((metrics.breakevens[1] - 107.5).abs() < 1e-6);
    assert!(metrics.probability_of_profit > 0.0 && metrics.probability_of_profit < 1.0);
}

#[test]
fn test_naked_short_call_has_no_capital_bound() {
    let strategy = StrategyInstance::new("sc", "Short Call", vec![Leg::sell_call(105.0, 2.0)]);

    let metrics = StrategyMetrics::compute(&strategy, &market()).unwrap();

    assert!(metrics.max_loss.is_unbounded());
    assert_eq!(metrics.max_profit.finite(), Some(200.0));
    assert_eq!(capital_requirement(&strategy), None);
}

#[test]
fn test_json_strategy_round_trip_gives_identical_curve() {
    let strategy = StrategyInstance::new(
        "ic",
        "Iron Condor",
        vec![
            Leg::buy_put(85.0, 0.4),
            Leg::sell_put(90.0, 1.2),
            Leg::sell_call(110.0, 1.1),
            Leg::buy_call(115.0, 0.3),
        ],
    );
    let spec = CurveSpec::new(70.0, 130.0, 0.5);

    let json = serde_json::to_string(&strategy).unwrap();
    let decoded: StrategyInstance = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, strategy);

    let original = generate_curve(&strategy, &market(), &spec, CurveMode::AtExpiration).unwrap();
    let replayed = generate_curve(&decoded, &market(), &spec, CurveMode::AtExpiration).unwrap();
    assert_eq!(original, replayed);

    let mtm = generate_curve(&decoded, &market(), &spec, CurveMode::MarkToModel).unwrap();
    assert_eq!(mtm.len(), original.len());
}

#[test]
fn test_metrics_json_shape() {
    let strategy = StrategyInstance::new("lc", "Long Call", vec![Leg::buy_call(100.0, 4.0)]);
    let metrics = StrategyMetrics::compute(&strategy, &market()).unwrap();

    let value = serde_json::to_value(&metrics).unwrap();
    assert_eq!(value["maxProfit"]["kind"], "unbounded");
    assert_eq!(value["maxLoss"]["kind"], "finite");
    assert_eq!(value["returnOnRisk"]["kind"], "n/a");
    assert!(value["probabilityOfProfit"].is_number());
    assert!(value["greeks"]["delta"].is_number());
}

proptest! {
    #[test]
    fn prop_debit_call_spread_metrics(
        lower in 50.0f64..150.0,
        width in 11.0f64..40.0,
        long_premium in 1.0f64..10.0,
        short_fraction in 0.0f64..0.9,
    ) {
        let short_premium = long_premium * short_fraction;
        let debit = long_premium - short_premium;
        let strategy = StrategyInstance::new(
            "bcs",
            "Bull Call Spread",
            vec![
                Leg::buy_call(lower, long_premium),
                Leg::sell_call(lower + width, short_premium),
            ],
        );
        let market = MarketContext::new(lower, 0.3, 30, 0.05);

        let metrics = StrategyMetrics::compute(&strategy, &market).unwrap();

        prop_assert_eq!(metrics.breakevens.len(), 1);
        prop_assert!((metrics.breakevens[0] - (lower + debit)).abs() < 1e-6);
        let profit = metrics.max_profit.finite().unwrap();
        let loss = metrics.max_loss.finite().unwrap();
        prop_assert!((profit - (width - debit) * 100.0).abs() < 1e-6);
        prop_assert!((loss + debit * 100.0).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&metrics.probability_of_profit));
    }
}
