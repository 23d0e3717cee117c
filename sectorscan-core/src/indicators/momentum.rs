//! Momentum: percentage return over a lookback.
//!
//! momentum = (close[t] / close[t-lookback] - 1) * 100
//! Lookback: lookback + 1.

use super::Indicator;
use crate::domain::PricePoint;

/// Percent return from the close `lookback` steps before the last one.
///
/// `None` if the series is not longer than `lookback` or the base close is zero.
pub fn momentum_return(closes: &[f64], lookback: usize) -> Option<f64> {
    if closes.len() <= lookback {
        return None;
    }
    let base = closes[closes.len() - 1 - lookback];
    if base == 0.0 {
        return None;
    }
    let last = closes[closes.len() - 1];
    Some((last / base - 1.0) * 100.0)
}

#[derive(Debug, Clone)]
pub struct MomentumReturn {
    lookback: usize,
    name: String,
}

impl MomentumReturn {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "Momentum lookback must be >= 1");
        Self {
            lookback,
            name: format!("momentum_{lookback}"),
        }
    }
}

impl Indicator for MomentumReturn {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.lookback + 1
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
        momentum_return(&closes, self.lookback)
    }
}
