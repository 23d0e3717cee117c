//! Position sizer: score tier and volatility into a tranche plan with an
//! ATR stop.
//!
//! # Formula
//! ```text
//! max_position  = tier(score)            12 / 9 / 6 / 3 %
//! risk_budget   = band(volatility20)     0.4 / 0.6 / 0.8 %
//! tranches      = 40% / 30% / remainder of max_position
//! stop_price    = close - 2 * ATR
//! ```
//!
//! Pure and stateless: the same inputs always give the same plan.

use crate::domain::{PositionPlan, SHARE_FORMULA};
use crate::numeric::round_to;

/// Stop distance in ATRs.
pub const ATR_STOP_MULTIPLIER: f64 = 2.0;

const INITIAL_FRACTION: f64 = 0.4;
const FIRST_ADD_FRACTION: f64 = 0.3;

/// Maximum position (percent of capital) for a composite score.
pub fn max_position_pct(score: f64) -> f64 {
    if score >= 80.0 {
        12.0
    } else if score >= 70.0 {
        9.0
    } else if score >= 60.0 {
        6.0
    } else {
        3.0
    }
}

/// Per-trade risk budget (percent of capital) for an annualized volatility.
///
/// Unknown volatility gets the middle band.
pub fn risk_budget_pct(volatility20: Option<f64>) -> f64 {
    match volatility20 {
        None => 0.6,
        Some(v) if v >= 35.0 => 0.4,
        Some(v) if v >= 25.0 => 0.6,
        Some(_) => 0.8,
    }
}

/// Build the sizing plan for one pick.
///
/// The second add-on tranche absorbs rounding so the three tranches sum to
/// `max_position_pct`. A stop is only set when ATR is known and `close > 0`.
pub fn position_plan(
    score: f64,
    close: f64,
    atr14: Option<f64>,
    volatility20: Option<f64>,
) -> PositionPlan {
    let max_position = max_position_pct(score);
    let initial = round_to(max_position * INITIAL_FRACTION, 1);
    let add_1 = round_to(max_position * FIRST_ADD_FRACTION, 1);
    let add_2 = round_to(max_position - (initial + add_1), 1);

    let (stop_price, stop_distance_pct) = match atr14 {
        Some(atr) if close > 0.0 => {
            let distance = ATR_STOP_MULTIPLIER * atr;
            (
                Some(round_to((close - distance).max(0.0), 2)),
                Some(round_to(distance / close * 100.0, 2)),
            )
        }
        _ => (None, None),
    };

    PositionPlan {
        max_position_pct: max_position,
        initial_position_pct: initial,
        add_position_pct_1: add_1,
        add_position_pct_2: add_2,
        risk_budget_pct: risk_budget_pct(volatility20),
        stop_price,
        stop_distance_pct,
        share_formula: SHARE_FORMULA.to_string(),
    }
}
