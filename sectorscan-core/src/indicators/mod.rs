//! Indicator library.
//!
//! Every indicator is available two ways: as a free function over a slice
//! (closes or price points) returning the latest value, and as a configured
//! value type implementing [`Indicator`] so factor computation can be
//! table-driven. All of them return `None` during warmup instead of failing.

pub mod atr;
pub mod liquidity;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod trend;
pub mod volatility;

pub use atr::{atr_wilder, true_ranges, wilder_smooth, Atr};
pub use liquidity::{average_traded_value, Liquidity};
pub use momentum::{momentum_return, MomentumReturn};
pub use rsi::{rsi_wilder, Rsi};
pub use sma::{sma, Sma};
pub use trend::trend_score;
pub use volatility::{volatility_annualized, Volatility, TRADING_DAYS_PER_YEAR};

use crate::domain::PricePoint;

/// Trait for indicators evaluated at the end of a price series.
///
/// # Look-ahead contamination guard
/// The value for a series may only depend on points inside that series;
/// truncating the series must give the value as of the truncation point.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of points needed before the indicator produces a value.
    fn lookback(&self) -> usize;

    /// Latest value over the series, `None` while warming up.
    fn value(&self, prices: &[PricePoint]) -> Option<f64>;
}

/// Create synthetic price points from closes for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first point),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_prices(closes: &[f64]) -> Vec<PricePoint> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PricePoint {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
