//! Strategy template catalog.
//!
//! Each template is tagged with the sentiments it serves. Bullish-only
//! templates never carry a bearish tag and vice versa.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Market view a trader asks the optimizer to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sentiment {
    /// Expects a large decline.
    VeryBearish,
    /// Expects a decline.
    Bearish,
    /// Expects the price to stay near spot.
    Neutral,
    /// Expects a large move in either direction.
    Directional,
    /// Expects a rise.
    Bullish,
    /// Expects a large rise.
    VeryBullish,
}

impl Sentiment {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryBearish => "veryBearish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
            Self::Directional => "directional",
            Self::Bullish => "bullish",
            Self::VeryBullish => "veryBullish",
        }
    }

    /// Whether the view expects the price to fall.
    #[must_use]
    pub const fn is_bearish(self) -> bool {
        matches!(self, Self::VeryBearish | Self::Bearish)
    }

    /// Whether the view expects the price to rise.
    #[must_use]
    pub const fn is_bullish(self) -> bool {
        matches!(self, Self::VeryBullish | Self::Bullish)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy shapes the optimizer can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyTemplate {
    /// Buy one call.
    LongCall,
    /// Buy one put.
    LongPut,
    /// Buy a call, sell a higher call.
    BullCallSpread,
    /// Buy a put, sell a lower put.
    BearPutSpread,
    /// Sell a put, buy a lower put.
    BullPutSpread,
    /// Sell a call, buy a higher call.
    BearCallSpread,
    /// Sell one put.
    ShortPut,
    /// Own shares, sell a call against them.
    CoveredCall,
    /// Buy a call and a put at the same strike.
    LongStraddle,
    /// Buy an out-of-the-money call and put.
    LongStrangle,
    /// Bull put spread plus bear call spread.
    IronCondor,
    /// Short straddle with long wings.
    IronButterfly,
    /// Buy the wings, sell two body calls.
    LongCallButterfly,
}

impl StrategyTemplate {
    /// Every template, in catalog order.
    pub const ALL: [Self; 13] = [
        Self::LongCall,
        Self::LongPut,
        Self::BullCallSpread,
        Self::BearPutSpread,
        Self::BullPutSpread,
        Self::BearCallSpread,
        Self::ShortPut,
        Self::CoveredCall,
        Self::LongStraddle,
        Self::LongStrangle,
        Self::IronCondor,
        Self::IronButterfly,
        Self::LongCallButterfly,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LongCall => "Long Call",
            Self::LongPut => "Long Put",
            Self::BullCallSpread => "Bull Call Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::BullPutSpread => "Bull Put Spread",
            Self::BearCallSpread => "Bear Call Spread",
            Self::ShortPut => "Short Put",
            Self::CoveredCall => "Covered Call",
            Self::LongStraddle => "Long Straddle",
            Self::LongStrangle => "Long Strangle",
            Self::IronCondor => "Iron Condor",
            Self::IronButterfly => "Iron Butterfly",
            Self::LongCallButterfly => "Long Call Butterfly",
        }
    }

    /// Identifier prefix for generated strategies.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::LongCall => "long-call",
            Self::LongPut => "long-put",
            Self::BullCallSpread => "bull-call-spread",
            Self::BearPutSpread => "bear-put-spread",
            Self::BullPutSpread => "bull-put-spread",
            Self::BearCallSpread => "bear-call-spread",
            Self::ShortPut => "short-put",
            Self::CoveredCall => "covered-call",
            Self::LongStraddle => "long-straddle",
            Self::LongStrangle => "long-strangle",
            Self::IronCondor => "iron-condor",
            Self::IronButterfly => "iron-butterfly",
            Self::LongCallButterfly => "long-call-butterfly",
        }
    }

    /// Sentiments this template serves.
    #[must_use]
    pub const fn sentiments(self) -> &'static [Sentiment] {
        use Sentiment::{Bearish, Bullish, Directional, Neutral, VeryBearish, VeryBullish};
        match self {
            Self::LongCall | Self::BullCallSpread => &[Bullish, VeryBullish],
            Self::LongPut | Self::BearPutSpread => &[Bearish, VeryBearish],
            Self::BullPutSpread | Self::ShortPut | Self::CoveredCall => &[Bullish],
            Self::BearCallSpread => &[Bearish],
            Self::LongStraddle | Self::LongStrangle => &[Directional],
            Self::IronCondor | Self::IronButterfly | Self::LongCallButterfly => &[Neutral],
        }
    }

    /// Whether the template is tagged with `sentiment`.
    #[must_use]
    pub fn serves(self, sentiment: Sentiment) -> bool {
        self.sentiments().contains(&sentiment)
    }
}

impl fmt::Display for StrategyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Templates tagged with `sentiment`, in catalog order.
#[must_use]
pub fn templates_for(sentiment: Sentiment) -> Vec<StrategyTemplate> {
    StrategyTemplate::ALL
        .into_iter()
        .filter(|t| t.serves(sentiment))
        .collect()
}
