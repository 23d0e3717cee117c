//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes.
//! Lookback: period.

use super::Indicator;
use crate::domain::PricePoint;

/// Mean of the last `window` values, `None` if fewer are available.
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let chunk = &values[values.len() - window..];
    Some(chunk.iter().sum::<f64>() / window as f64)
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn value(&self, prices: &[PricePoint]) -> Option<f64> {
        let tail = &prices[prices.len().saturating_sub(self.period)..];
        let closes: Vec<f64> = tail.iter().map(|p| p.close).collect();
        sma(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_prices, DEFAULT_EPSILON};

    #[test]
    fn sma_uses_trailing_window() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        // mean(12,13,14,15,16) = 14.0
        assert_approx(sma(&values, 5).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_exact_length() {
        assert_approx(sma(&[2.0, 4.0, 6.0], 3).unwrap(), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_values() {
        assert_eq!(sma(&[10.0, 11.0], 5), None);
    }

    #[test]
    fn sma_zero_window() {
        assert_eq!(sma(&[10.0, 11.0], 0), None);
    }

    #[test]
    fn sma_indicator_matches_function() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let prices = make_prices(&closes);
        assert_eq!(Sma::new(5).value(&prices), sma(&closes, 5));
        assert_eq!(Sma::new(20).name(), "sma_20");
        assert_eq!(Sma::new(20).lookback(), 20);
    }

    #[test]
    fn sma_indicator_short_history_is_none() {
        let prices = make_prices(&[10.0, 11.0, 12.0]);
        assert_eq!(Sma::new(5).value(&prices), None);
        assert_eq!(Sma::new(3).value(&prices), Some(11.0));
    }
}
