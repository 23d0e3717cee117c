//! PricePoint: one daily OHLCV observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// Series handed to the indicator library are chronological (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Positive prices and `high >= low`.
    pub fn is_sane(&self) -> bool {
        self.open > 0.0
            && self.high > 0.0
            && self.low > 0.0
            && self.close > 0.0
            && self.high >= self.low
    }

    /// Traded value for the day (close × volume).
    pub fn traded_value(&self) -> f64 {
        self.close * self.volume as f64
    }
}

/// Extract the close column from a price series.
pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
