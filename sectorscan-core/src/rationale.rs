//! Short human-readable reasons attached to each pick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, CategoryScores};

/// Most reasons shown for one pick.
pub const MAX_REASONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    BullishTrend,
    StrongMomentum,
    RelativeValue,
    RevenueGrowth,
    BalancedRisk,
    CompositeRanking,
}

impl Reason {
    /// The reason a category earns, with the score it needs.
    fn for_category(category: Category) -> (Self, f64) {
        match category {
            Category::Trend => (Reason::BullishTrend, 70.0),
            Category::Momentum => (Reason::StrongMomentum, 70.0),
            Category::Value => (Reason::RelativeValue, 65.0),
            Category::Fundamental => (Reason::RevenueGrowth, 60.0),
            Category::RiskControl => (Reason::BalancedRisk, 60.0),
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Reason::BullishTrend => "moving averages in bullish alignment",
            Reason::StrongMomentum => "63/126-day momentum in the top of the peer group",
            Reason::RelativeValue => "valuation reasonable relative to peers",
            Reason::RevenueGrowth => "revenue growth percentile is high",
            Reason::BalancedRisk => "good balance of volatility and liquidity",
            Reason::CompositeRanking => {
                "score comes from the multi-factor composite, not a single indicator"
            }
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Reasons earned by a set of category scores, in category order.
///
/// Never empty: falls back to [`Reason::CompositeRanking`].
pub fn reasons(scores: &CategoryScores) -> Vec<Reason> {
    let mut out: Vec<Reason> = Category::ALL
        .iter()
        .filter_map(|&category| {
            let (reason, threshold) = Reason::for_category(category);
            (scores.get(category) >= threshold).then_some(reason)
        })
        .take(MAX_REASONS)
        .collect();
    if out.is_empty() {
        out.push(Reason::CompositeRanking);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_strong_is_capped_at_three() {
        let got = reasons(&CategoryScores::uniform(90.0));
        assert_eq!(
            got,
            vec![
                Reason::BullishTrend,
                Reason::StrongMomentum,
                Reason::RelativeValue
            ]
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        let scores = CategoryScores::new(69.99, 70.0, 64.99, 60.0, 60.0);
        assert_eq!(
            reasons(&scores),
            vec![
                Reason::StrongMomentum,
                Reason::RevenueGrowth,
                Reason::BalancedRisk
            ]
        );
    }

    #[test]
    fn nothing_qualifies_gives_fallback() {
        assert_eq!(
            reasons(&CategoryScores::default()),
            vec![Reason::CompositeRanking]
        );
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Reason::BalancedRisk).unwrap();
        assert_eq!(json, "\"balanced_risk\"");
        assert_eq!(Reason::BullishTrend.to_string(), Reason::BullishTrend.text());
    }
}
