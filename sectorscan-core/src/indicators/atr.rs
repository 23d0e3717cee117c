//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (recursive average with alpha = 1/period).
//! Lookback: period + 1 (the first point has no previous close).

use super::Indicator;
use crate::domain::PricePoint;

/// True Range series, one entry per step (length `prices.len() - 1`).
///
/// TR[i] describes `prices[i + 1]` against the close of `prices[i]`.
pub fn true_ranges(prices: &[PricePoint]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect()
}

/// Final value of a Wilder-smoothed series.
///
/// Seed: mean of the first `period` values. Every later value updates the
/// average as `(avg * (period - 1) + value) / period`, in order.
pub fn wilder_smooth(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let n = period as f64;
    Some(
        values[period..]
            .iter()
            .fold(seed, |avg, &v| (avg * (n - 1.0) + v) / n),
    )
}

/// Wilder ATR over the whole series, `None` with fewer than `window + 1` points.
pub fn atr_wilder(prices: &[PricePoint], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window + 1 {
        return None;
    }
    wilder_smooth(&true_ranges(prices), window)
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        atr_wilder(prices, self.period)
    }
}
