//! Cross-sectional normalizer.
//!
//! Ranks each raw factor against the whole batch of the current run and
//! averages related percentiles into category scores. Building
//! [`FactorPools`] needs every candidate's factors, so it is the one
//! synchronization point of the pipeline.

use crate::domain::{CategoryScores, RawFactorSet, NEUTRAL_SCORE};
use crate::numeric::{mean_or, round_to};

/// Percent of `pool` at or below `value`.
///
/// Ties count inclusively, so with duplicated maxima more than one value
/// can rank 100.0. `None` when the value is missing or the pool is empty.
pub fn percentile_rank(value: Option<f64>, pool: &[f64]) -> Option<f64> {
    let x = value?;
    if pool.is_empty() {
        return None;
    }
    let at_or_below = pool.iter().filter(|&&p| p <= x).count();
    Some(at_or_below as f64 / pool.len() as f64 * 100.0)
}

/// `100 - percentile`, for factors where lower is better.
fn inverse_rank(value: Option<f64>, pool: &[f64]) -> Option<f64> {
    percentile_rank(value, pool).map(|p| 100.0 - p)
}

/// Reference pools for one batch.
#[derive(Debug, Clone, Default)]
pub struct FactorPools {
    pub momentum63: Vec<f64>,
    pub momentum126: Vec<f64>,
    pub pe: Vec<f64>,
    pub pb: Vec<f64>,
    pub dividend_yield: Vec<f64>,
    pub revenue_yoy: Vec<f64>,
    pub revenue_mom: Vec<f64>,
    pub volatility20: Vec<f64>,
    pub liquidity20: Vec<f64>,
}

impl FactorPools {
    /// Collect the present values of every factor across the batch.
    ///
    /// Non-positive PE, PB and liquidity are left out of their pools.
    pub fn from_batch(batch: &[RawFactorSet]) -> Self {
        fn pool<F>(batch: &[RawFactorSet], field: F, positive_only: bool) -> Vec<f64>
        where
            F: Fn(&RawFactorSet) -> Option<f64>,
        {
            batch
                .iter()
                .filter_map(field)
                .filter(|v| !positive_only || *v > 0.0)
                .collect()
        }

        Self {
            momentum63: pool(batch, |r| r.momentum63, false),
            momentum126: pool(batch, |r| r.momentum126, false),
            pe: pool(batch, |r| r.pe, true),
            pb: pool(batch, |r| r.pb, true),
            dividend_yield: pool(batch, |r| r.dividend_yield, false),
            revenue_yoy: pool(batch, |r| r.revenue_yoy, false),
            revenue_mom: pool(batch, |r| r.revenue_mom, false),
            volatility20: pool(batch, |r| r.volatility20, false),
            liquidity20: pool(batch, |r| r.liquidity20, true),
        }
    }

    pub fn momentum_score(&self, raw: &RawFactorSet) -> f64 {
        category([
            percentile_rank(raw.momentum63, &self.momentum63),
            percentile_rank(raw.momentum126, &self.momentum126),
        ])
    }

    /// Cheaper (lower PE/PB) and higher yield score better.
    pub fn value_score(&self, raw: &RawFactorSet) -> f64 {
        category([
            inverse_rank(raw.pe, &self.pe),
            inverse_rank(raw.pb, &self.pb),
            percentile_rank(raw.dividend_yield, &self.dividend_yield),
        ])
    }

    pub fn fundamental_score(&self, raw: &RawFactorSet) -> f64 {
        category([
            percentile_rank(raw.revenue_yoy, &self.revenue_yoy),
            percentile_rank(raw.revenue_mom, &self.revenue_mom),
        ])
    }

    /// Calmer and more liquid score better.
    pub fn risk_control_score(&self, raw: &RawFactorSet) -> f64 {
        category([
            inverse_rank(raw.volatility20, &self.volatility20),
            percentile_rank(raw.liquidity20, &self.liquidity20),
        ])
    }

    /// All five category scores; trend is taken as-is from the raw set.
    pub fn category_scores(&self, raw: &RawFactorSet) -> CategoryScores {
        CategoryScores {
            trend: raw.trend_score,
            momentum: self.momentum_score(raw),
            value: self.value_score(raw),
            fundamental: self.fundamental_score(raw),
            risk_control: self.risk_control_score(raw),
        }
    }
}

fn category<const N: usize>(inputs: [Option<f64>; N]) -> f64 {
    round_to(mean_or(inputs, NEUTRAL_SCORE), 2)
}

/// Category scores for every candidate in the batch, in input order.
pub fn score_batch(batch: &[RawFactorSet]) -> Vec<CategoryScores> {
    let pools = FactorPools::from_batch(batch);
    batch.iter().map(|raw| pools.category_scores(raw)).collect()
}
