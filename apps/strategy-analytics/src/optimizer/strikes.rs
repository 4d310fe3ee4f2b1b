//! Deterministic strike selection.
//!
//! Strikes snap to a listed-strike grid whose increment depends on the
//! underlying price. Every template derives its strikes from three numbers:
//! the at-the-money strike `atm`, the snapped target `tgt`, and a distance
//! `d = max(increment, snap(|target - spot|))`.

use crate::options::{LegAction, OptionType};

use super::catalog::StrategyTemplate;

/// Listed-strike spacing for an underlying price.
#[must_use]
pub fn strike_increment(spot: f64) -> f64 {
    match spot {
        s if s < 25.0 => 0.5,
        s if s < 100.0 => 1.0,
        s if s < 250.0 => 2.5,
        s if s < 1000.0 => 5.0,
        _ => 10.0,
    }
}

/// Round `price` to the nearest multiple of `increment`.
#[must_use]
pub fn snap(price: f64, increment: f64) -> f64 {
    (price / increment).round() * increment
}

/// Snapped reference strikes for one optimizer request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeInputs {
    /// Grid spacing.
    pub increment: f64,
    /// Spot snapped to the grid.
    pub atm: f64,
    /// Target price snapped to the grid.
    pub target: f64,
    /// Snapped spot-to-target distance, at least one increment.
    pub distance: f64,
}

impl StrikeInputs {
    /// Derive the reference strikes; `increment` overrides the price-based grid.
    #[must_use]
    pub fn new(spot: f64, target: f64, increment: Option<f64>) -> Self {
        let increment = increment.unwrap_or_else(|| strike_increment(spot));
        Self {
            increment,
            atm: snap(spot, increment),
            target: snap(target, increment),
            distance: increment.max(snap((target - spot).abs(), increment)),
        }
    }

    /// Target strike when it lies above `atm`, else one distance above.
    fn upside(&self) -> f64 {
        if self.target > self.atm {
            self.target
        } else {
            self.atm + self.distance
        }
    }

    /// Target strike when it lies below `atm`, else one distance below.
    fn downside(&self) -> f64 {
        if self.target < self.atm {
            self.target
        } else {
            self.atm - self.distance
        }
    }
}

/// One leg of a template before pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPlan {
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub action: LegAction,
    /// Strike price.
    pub strike: f64,
    /// Number of contracts.
    pub quantity: u32,
}

const fn plan(option_type: OptionType, action: LegAction, strike: f64, quantity: u32) -> LegPlan {
    LegPlan {
        option_type,
        action,
        strike,
        quantity,
    }
}

/// Concrete legs for `template`, or `None` when a strike would be
/// non-positive.
///
/// | Template | Legs |
/// |----------|------|
/// | Long Call | +C(atm) |
/// | Long Put | +P(atm) |
/// | Bull Call Spread | +C(atm) -C(up) |
/// | Bear Put Spread | +P(atm) -P(down) |
/// | Bull Put Spread | -P(atm) +P(atm-d) |
/// | Bear Call Spread | -C(atm) +C(atm+d) |
/// | Short Put | -P(atm) |
/// | Covered Call | stock, -C(up) |
/// | Long Straddle | +C(atm) +P(atm) |
/// | Long Strangle | +C(atm+d) +P(atm-d) |
/// | Iron Condor | +P(atm-2d) -P(atm-d) -C(atm+d) +C(atm+2d) |
/// | Iron Butterfly | +P(atm-d) -P(atm) -C(atm) +C(atm+d) |
/// | Long Call Butterfly | +C(tgt-d) -2C(tgt) +C(tgt+d) |
///
/// `up` is the target when above `atm`, else `atm+d`; `down` mirrors it.
/// Since `d` is at least one increment, bought and sold strikes of the same
/// option type never coincide.
#[must_use]
pub fn select_strikes(template: StrategyTemplate, inputs: &StrikeInputs) -> Option<Vec<LegPlan>> {
    use LegAction::{Buy, Sell};
    use OptionType::{Call, Put};

    let StrikeInputs {
        atm,
        target,
        distance: d,
        ..
    } = *inputs;

    let legs = match template {
        StrategyTemplate::LongCall => vec![plan(Call, Buy, atm, 1)],
        StrategyTemplate::LongPut => vec![plan(Put, Buy, atm, 1)],
        StrategyTemplate::BullCallSpread => {
            vec![plan(Call, Buy, atm, 1), plan(Call, Sell, inputs.upside(), 1)]
        }
        StrategyTemplate::BearPutSpread => {
            vec![plan(Put, Buy, atm, 1), plan(Put, Sell, inputs.downside(), 1)]
        }
        StrategyTemplate::BullPutSpread => {
            vec![plan(Put, Sell, atm, 1), plan(Put, Buy, atm - d, 1)]
        }
        StrategyTemplate::BearCallSpread => {
            vec![plan(Call, Sell, atm, 1), plan(Call, Buy, atm + d, 1)]
        }
        StrategyTemplate::ShortPut => vec![plan(Put, Sell, atm, 1)],
        StrategyTemplate::CoveredCall => vec![plan(Call, Sell, inputs.upside(), 1)],
        StrategyTemplate::LongStraddle => vec![plan(Call, Buy, atm, 1), plan(Put, Buy, atm, 1)],
        StrategyTemplate::LongStrangle => {
            vec![plan(Call, Buy, atm + d, 1), plan(Put, Buy, atm - d, 1)]
        }
        StrategyTemplate::IronCondor => vec![
            plan(Put, Buy, 2.0f64.mul_add(-d, atm), 1),
            plan(Put, Sell, atm - d, 1),
            plan(Call, Sell, atm + d, 1),
            plan(Call, Buy, 2.0f64.mul_add(d, atm), 1),
        ],
        StrategyTemplate::IronButterfly => vec![
            plan(Put, Buy, atm - d, 1),
            plan(Put, Sell, atm, 1),
            plan(Call, Sell, atm, 1),
            plan(Call, Buy, atm + d, 1),
        ],
        StrategyTemplate::LongCallButterfly => vec![
            plan(Call, Buy, target - d, 1),
            plan(Call, Sell, target, 2),
            plan(Call, Buy, target + d, 1),
        ],
    };

    legs.iter().all(|l| l.strike > 0.0).then_some(legs)
}
