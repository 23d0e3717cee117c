//! Liquidity: average daily traded value (close × volume).
//! Lookback: period.

use super::Indicator;
use crate::domain::PricePoint;

/// Mean close × volume over the last `window` points.
pub fn average_traded_value(prices: &[PricePoint], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window {
        return None;
    }
    let chunk = &prices[prices.len() - window..];
    Some(chunk.iter().map(PricePoint::traded_value).sum::<f64>() / window as f64)
}

#[derive(Debug, Clone)]
pub struct Liquidity {
    period: usize,
    name: String,
}

impl Liquidity {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Liquidity period must be >= 1");
        Self {
            period,
            name: format!("liquidity_{period}"),
        }
    }
}

impl Indicator for Liquidity {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        average_traded_value(prices, self.period)
    }
}
