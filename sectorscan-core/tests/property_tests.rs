//! Property tests for scoring invariants.
//!
//! Uses proptest to verify:
//! 1. Percentile ranks stay inside [0, 100]
//! 2. Category scores stay inside [0, 100] for any batch
//! 3. Tranches add up to the maximum position
//! 4. Ranking is sorted descending and stable on ties
//! 5. Indicators never look past the end of the series they are given

use chrono::NaiveDate;
use proptest::prelude::*;
use sectorscan_core::domain::{Category, CategoryScores, PricePoint, RawFactorSet};
use sectorscan_core::factors::FactorIndicators;
use sectorscan_core::indicators::Indicator;
use sectorscan_core::{percentile_rank, position_plan, rank, score_batch, CategoryWeights};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_score() -> impl Strategy<Value = f64> {
    (0.0..=100.0_f64).prop_map(|s| (s * 100.0).round() / 100.0)
}

fn arb_scores() -> impl Strategy<Value = CategoryScores> {
    (arb_score(), arb_score(), arb_score(), arb_score(), arb_score())
        .prop_map(|(t, m, v, f, r)| CategoryScores::new(t, m, v, f, r))
}

fn arb_opt(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<f64>> {
    prop::option::of(range)
}

fn arb_raw() -> impl Strategy<Value = RawFactorSet> {
    (
        arb_opt(-60.0..200.0),
        arb_opt(-60.0..200.0),
        arb_opt(-5.0..80.0),
        arb_opt(-1.0..12.0),
        arb_opt(0.0..10.0),
        arb_opt(-50.0..150.0),
        arb_opt(5.0..90.0),
        arb_opt(0.0..1e10),
        arb_score(),
    )
        .prop_map(|(m63, m126, pe, pb, dy, yoy, vol, liq, trend)| RawFactorSet {
            close: 100.0,
            momentum63: m63,
            momentum126: m126,
            pe,
            pb,
            dividend_yield: dy,
            revenue_yoy: yoy,
            revenue_mom: yoy.map(|y| y / 10.0),
            volatility20: vol,
            liquidity20: liq,
            trend_score: trend,
            ..Default::default()
        })
}

fn walk(steps: &[f64]) -> Vec<PricePoint> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut close = 100.0_f64;
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let open = close;
            close = (close * (1.0 + step)).max(1.0);
            PricePoint::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                10_000 + i as u64,
            )
        })
        .collect()
}

// ── 1. Percentile bounds ─────────────────────────────────────────────

proptest! {
    #[test]
    fn percentile_rank_is_bounded(
        x in -1e6..1e6_f64,
        pool in prop::collection::vec(-1e6..1e6_f64, 1..50),
    ) {
        let p = percentile_rank(Some(x), &pool).unwrap();
        prop_assert!((0.0..=100.0).contains(&p));
    }

    /// The pool maximum always ranks 100.
    #[test]
    fn pool_maximum_ranks_100(pool in prop::collection::vec(-1e6..1e6_f64, 1..50)) {
        let max = pool.iter().cloned().fold(f64::MIN, f64::max);
        prop_assert_eq!(percentile_rank(Some(max), &pool), Some(100.0));
    }
}

// ── 2. Category scores bounded ───────────────────────────────────────

proptest! {
    #[test]
    fn category_scores_are_bounded(batch in prop::collection::vec(arb_raw(), 1..30)) {
        for scores in score_batch(&batch) {
            for category in Category::ALL {
                let s = scores.get(category);
                prop_assert!((0.0..=100.0).contains(&s), "{category} = {s}");
            }
        }
    }
}

// ── 3. Tranche sums ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn tranches_sum_to_max(
        score in 0.0..100.0_f64,
        close in 1.0..2000.0_f64,
        atr in prop::option::of(0.01..100.0_f64),
        vol in prop::option::of(1.0..120.0_f64),
    ) {
        let plan = position_plan(score, close, atr, vol);
        prop_assert!((plan.tranche_total() - plan.max_position_pct).abs() < 0.05);
        if let Some(stop) = plan.stop_price {
            prop_assert!(stop >= 0.0 && stop <= close);
        }
    }
}

// ── 4. Stable descending ranking ─────────────────────────────────────

proptest! {
    #[test]
    fn ranking_is_sorted_and_stable(rows in prop::collection::vec(arb_scores(), 0..40)) {
        let input: Vec<(usize, CategoryScores)> = rows.into_iter().enumerate().collect();
        let ranked = rank(input, &CategoryWeights::default());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].total_score >= pair[1].total_score);
            if pair[0].total_score == pair[1].total_score {
                prop_assert!(pair[0].item < pair[1].item);
            }
        }
    }

    #[test]
    fn composite_is_bounded(scores in arb_scores()) {
        let total = CategoryWeights::default().composite(&scores);
        prop_assert!((0.0..=100.0).contains(&total));
    }
}

// ── 5. No look-ahead ─────────────────────────────────────────────────

proptest! {
    /// Appending future points never changes the value computed on a prefix.
    #[test]
    fn indicators_ignore_future_points(
        steps in prop::collection::vec(-0.08..0.08_f64, 140..220),
        cut in 130usize..140,
    ) {
        let full = walk(&steps);
        let prefix = &full[..cut];
        let again = walk(&steps[..cut]);
        let table = FactorIndicators::default();
        let indicators: [&dyn Indicator; 4] = [
            &table.sma_long,
            &table.rsi,
            &table.atr,
            &table.momentum_long,
        ];
        for ind in indicators {
            prop_assert_eq!(ind.value(prefix), ind.value(&again), "{}", ind.name());
        }
    }
}
