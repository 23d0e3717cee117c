//! Criterion benchmarks for the scoring hot paths.
//!
//! Benchmarks:
//! 1. Raw factor computation for one candidate (all indicators)
//! 2. Batch normalization + ranking + sizing for universes of 60 / 250 / 1000

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sectorscan_core::domain::{Candidate, CandidateData, Market, PricePoint, RawFactorSet, Valuation};
use sectorscan_core::{select_picks, CategoryWeights};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_prices(n: usize, phase: f64) -> Vec<PricePoint> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1 + phase).sin() * 10.0 + i as f64 * 0.05;
            PricePoint::new(
                base_date + chrono::Duration::days(i as i64),
                close - 0.3,
                close + 1.5,
                close - 1.5,
                close,
                1_000_000 + (i as u64 % 500_000),
            )
        })
        .collect()
}

fn make_candidate(i: usize) -> Candidate {
    Candidate {
        symbol: format!("{:04}", 1000 + i),
        market: if i % 2 == 0 { Market::Twse } else { Market::Tpex },
        name: format!("Company {i}"),
        industry: "半導體業".into(),
        monthly_revenue: 1e8 * (i + 1) as f64,
        revenue_yoy: Some((i % 40) as f64 - 10.0),
        revenue_mom: Some((i % 13) as f64 - 6.0),
    }
}

fn make_batch(n: usize) -> Vec<(Candidate, RawFactorSet)> {
    (0..n)
        .map(|i| {
            let data = CandidateData::new(
                make_candidate(i),
                make_prices(252, i as f64 * 0.37),
                Some(Valuation {
                    pe: 8.0 + (i % 30) as f64,
                    pb: 0.8 + (i % 7) as f64 * 0.4,
                    dividend_yield: (i % 9) as f64 * 0.5,
                }),
            );
            let raw = RawFactorSet::compute(&data).expect("non-empty series");
            (data.candidate, raw)
        })
        .collect()
}

// ── 1. Raw factors ───────────────────────────────────────────────────

fn bench_raw_factors(c: &mut Criterion) {
    let data = CandidateData::new(make_candidate(0), make_prices(252, 0.0), None);
    c.bench_function("raw_factors_252_points", |b| {
        b.iter(|| RawFactorSet::compute(black_box(&data)))
    });
}

// ── 2. Batch scoring ─────────────────────────────────────────────────

fn bench_select_picks(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_picks");
    let weights = CategoryWeights::default();
    for n in [60, 250, 1000] {
        let batch = make_batch(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &batch, |b, batch| {
            b.iter(|| select_picks(black_box(batch.clone()), &weights, 10))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_raw_factors, bench_select_picks);
criterion_main!(benches);
