//! Batch scoring: raw factor sets in, ranked picks with plans and reasons
//! out.

use serde::{Deserialize, Serialize};

use crate::domain::{Candidate, CategoryScores, Market, PositionPlan, RawFactorSet};
use crate::normalize::FactorPools;
use crate::rationale::{reasons, Reason};
use crate::scoring::{rank, CategoryWeights};
use crate::sizing::position_plan;

/// One ranked candidate in the final output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub symbol: String,
    pub name: String,
    pub market: Market,
    pub industry: String,
    pub close: f64,
    pub total_score: f64,
    pub scores: CategoryScores,
    pub factors: RawFactorSet,
    pub reasons: Vec<Reason>,
    pub plan: PositionPlan,
    /// Share count for the configured capital, when one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_shares: Option<u64>,
}

/// Normalize, rank and size a batch; return the best `top_n` picks.
///
/// Pools are built from the entire batch, so truncation to `top_n` happens
/// only after ranking.
pub fn select_picks(
    batch: Vec<(Candidate, RawFactorSet)>,
    weights: &CategoryWeights,
    top_n: usize,
) -> Vec<Pick> {
    let raws: Vec<RawFactorSet> = batch.iter().map(|(_, raw)| raw.clone()).collect();
    let pools = FactorPools::from_batch(&raws);

    let rows: Vec<_> = batch
        .into_iter()
        .map(|(candidate, raw)| {
            let scores = pools.category_scores(&raw);
            ((candidate, raw), scores)
        })
        .collect();

    rank(rows, weights)
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, ranked)| {
            let (candidate, raw) = ranked.item;
            Pick {
                rank: i + 1,
                plan: position_plan(ranked.total_score, raw.close, raw.atr14, raw.volatility20),
                reasons: reasons(&ranked.categories),
                symbol: candidate.symbol,
                name: candidate.name,
                market: candidate.market,
                industry: candidate.industry,
                close: raw.close,
                total_score: ranked.total_score,
                scores: ranked.categories,
                factors: raw,
                suggested_shares: None,
            }
        })
        .collect()
}

impl Pick {
    /// Fill `suggested_shares` for the given capital, entering at the close.
    pub fn with_capital(mut self, capital: f64) -> Self {
        self.suggested_shares = self.plan.suggested_shares(capital, self.close);
        self
    }
}
