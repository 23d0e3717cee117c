//! Annualized close-to-close volatility.
//!
//! Population standard deviation of the trailing `period` simple daily
//! returns, scaled by sqrt(252) and expressed in percent.
//! Lookback: period + 1.

use super::Indicator;
use crate::domain::PricePoint;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized volatility in percent.
///
/// `None` unless there are at least `window + 1` closes and at least
/// `window` usable returns; steps with a zero previous close are skipped.
pub fn volatility_annualized(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window + 1 {
        return None;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.len() < window {
        return None;
    }

    let chunk = &returns[returns.len() - window..];
    let n = chunk.len() as f64;
    let mean = chunk.iter().sum::<f64>() / n;
    let variance = chunk.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}

#[derive(Debug, Clone)]
pub struct Volatility {
    period: usize,
    name: String,
}

impl Volatility {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Volatility period must be >= 1");
        Self {
            period,
            name: format!("volatility_{period}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
        volatility_annualized(&closes, self.period)
    }
}
