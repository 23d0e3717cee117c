//! SectorScan Core: indicators, cross-sectional scoring, position sizing.
//!
//! This crate is the pure scoring engine of the theme screener:
//! - Domain types (price points, candidates, factor sets, category scores, plans)
//! - Indicator library (SMA, Wilder RSI/ATR, volatility, momentum, liquidity, trend)
//! - Cross-sectional normalizer (percentile ranks against the current batch)
//! - Composite scorer with validated category weights and stable ranking
//! - Position sizer with score tiers and an ATR stop
//! - Rationale selection and the theme registry
//!
//! Nothing here performs I/O; data retrieval lives in `sectorscan-runner`.

pub mod domain;
pub mod factors;
pub mod indicators;
pub mod normalize;
pub mod numeric;
pub mod picks;
pub mod rationale;
pub mod scoring;
pub mod sizing;
pub mod themes;

pub use factors::{FactorError, FactorIndicators};
pub use normalize::{percentile_rank, score_batch, FactorPools};
pub use picks::{select_picks, Pick};
pub use rationale::{reasons, Reason};
pub use scoring::{rank, CategoryWeights, Ranked, ScoringError};
pub use sizing::position_plan;
pub use themes::{RegistryError, ThemeRegistry, ThemeRule};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the runner moves across rayon workers
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::CandidateData>();
        require_sync::<domain::CandidateData>();
        require_send::<domain::RawFactorSet>();
        require_sync::<domain::RawFactorSet>();
        require_send::<FactorIndicators>();
        require_sync::<FactorIndicators>();
        require_send::<FactorPools>();
        require_sync::<FactorPools>();
        require_send::<Pick>();
        require_sync::<Pick>();
        require_send::<ThemeRegistry>();
        require_sync::<ThemeRegistry>();
    }

    /// The indicator trait is object-safe so factor tables can hold
    /// `&dyn Indicator`.
    #[test]
    fn indicator_trait_is_object_safe() {
        fn _latest(ind: &dyn indicators::Indicator, prices: &[domain::PricePoint]) -> Option<f64> {
            ind.value(prices)
        }
    }
}
