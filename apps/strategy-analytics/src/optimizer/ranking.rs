//! Candidate ranking.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::StrategyInstance;
use crate::strategy::{Extremum, PnlCurve, ReturnOnRisk, StrategyMetrics};

/// What the optimizer maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingMode {
    /// Highest return on risk; unbounded profit ranks first.
    #[default]
    MaxReturn,
    /// Highest probability of profit.
    MaxChance,
}

impl RankingMode {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxReturn => "maxReturn",
            Self::MaxChance => "maxChance",
        }
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optimizer result: the strategy, its metrics and its payoff curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStrategy {
    /// Generated strategy with priced legs.
    pub strategy: StrategyInstance,
    /// Metrics under the request's market.
    pub metrics: StrategyMetrics,
    /// At-expiration P&L curve.
    pub curve: PnlCurve,
    /// Capital the strategy ties up.
    pub required_capital: f64,
}

/// Sort `candidates` best-first under `mode`.
///
/// Ties fall back to lower required capital, then name, so the order is
/// total and independent of input order.
pub fn rank(candidates: &mut [RankedStrategy], mode: RankingMode) {
    candidates.sort_by(|a, b| {
        compare(a, b, mode)
            .then_with(|| a.required_capital.total_cmp(&b.required_capital))
            .then_with(|| a.strategy.name.cmp(&b.strategy.name))
    });
}

fn compare(a: &RankedStrategy, b: &RankedStrategy, mode: RankingMode) -> Ordering {
    match mode {
        RankingMode::MaxReturn => return_tier(&a.metrics)
            .cmp(&return_tier(&b.metrics))
            .then_with(|| {
                let ra = a.metrics.return_on_risk.ratio().unwrap_or(0.0);
                let rb = b.metrics.return_on_risk.ratio().unwrap_or(0.0);
                rb.total_cmp(&ra)
            }),
        RankingMode::MaxChance => b
            .metrics
            .probability_of_profit
            .total_cmp(&a.metrics.probability_of_profit),
    }
}

/// 0 = unbounded profit, 1 = finite ratio, 2 = not applicable.
fn return_tier(metrics: &StrategyMetrics) -> u8 {
    match (metrics.max_profit, metrics.return_on_risk) {
        (Extremum::Unbounded(_), _) => 0,
        (_, ReturnOnRisk::Ratio(_)) => 1,
        (_, ReturnOnRisk::NotApplicable) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Greeks;
    use crate::strategy::{CurveMode, TailDirection};

    fn candidate(
        name: &str,
        max_profit: Extremum,
        ror: ReturnOnRisk,
        pop: f64,
        capital: f64,
    ) -> RankedStrategy {
        RankedStrategy {
            strategy: StrategyInstance::new(name, name, vec![]),
            metrics: StrategyMetrics {
                max_profit,
                max_loss: Extremum::Finite(-capital),
                breakevens: vec![],
                probability_of_profit: pop,
                return_on_risk: ror,
                greeks: Greeks::zero(),
                net_premium: 0.0,
            },
            curve: PnlCurve {
                mode: CurveMode::AtExpiration,
                points: vec![],
            },
            required_capital: capital,
        }
    }

    fn names(candidates: &[RankedStrategy]) -> Vec<&str> {
        candidates.iter().map(|c| c.strategy.name.as_str()).collect()
    }

    #[test]
    fn test_max_return_order() {
        let mut candidates = vec![
            candidate("na", Extremum::Finite(0.0), ReturnOnRisk::NotApplicable, 0.9, 100.0),
            candidate("low", Extremum::Finite(50.0), ReturnOnRisk::Ratio(0.5), 0.6, 100.0),
            candidate(
                "unbounded",
                Extremum::Unbounded(TailDirection::Upward),
                ReturnOnRisk::NotApplicable,
                0.3,
                500.0,
            ),
            candidate("high", Extremum::Finite(300.0), ReturnOnRisk::Ratio(3.0), 0.2, 100.0),
        ];
        rank(&mut candidates, RankingMode::MaxReturn);
        assert_eq!(names(&candidates), vec!["unbounded", "high", "low", "na"]);
    }

    #[test]
    fn test_max_chance_order() {
        let mut candidates = vec![
            candidate("a", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.4, 100.0),
            candidate("b", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.7, 100.0),
            candidate("c", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.55, 100.0),
        ];
        rank(&mut candidates, RankingMode::MaxChance);
        assert_eq!(names(&candidates), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_break_on_capital_then_name() {
        let mut candidates = vec![
            candidate("zeta", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.5, 200.0),
            candidate("beta", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.5, 100.0),
            candidate("alpha", Extremum::Finite(1.0), ReturnOnRisk::Ratio(1.0), 0.5, 100.0),
        ];
        rank(&mut candidates, RankingMode::MaxChance);
        assert_eq!(names(&candidates), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_ranking_mode_wire_names() {
        let mode: RankingMode = serde_json::from_str("\"maxChance\"").unwrap();
        assert_eq!(mode, RankingMode::MaxChance);
        assert_eq!(RankingMode::MaxReturn.to_string(), "maxReturn");
    }
}
