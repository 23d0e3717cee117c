//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period + 1.
//! Edge case: avg_loss == 0 → RSI = 100 (including a flat series).

use super::atr::wilder_smooth;
use super::Indicator;
use crate::domain::PricePoint;

/// Wilder RSI over the whole close series, `None` with fewer than
/// `window + 1` closes.
pub fn rsi_wilder(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gain = wilder_smooth(&gains, window)?;
    let avg_loss = wilder_smooth(&losses, window)?;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
        rsi_wilder(&closes, self.period)
    }
}
