//! PositionPlan: sizing guidance for one pick.

use serde::{Deserialize, Serialize};

/// Share-count rule printed alongside every plan.
pub const SHARE_FORMULA: &str = "shares = (capital x risk budget %) / (entry price - stop price)";

/// Position sizing guidance, all figures in percent of capital.
///
/// The three tranches always sum to `max_position_pct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPlan {
    pub max_position_pct: f64,
    pub initial_position_pct: f64,
    pub add_position_pct_1: f64,
    pub add_position_pct_2: f64,
    pub risk_budget_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_distance_pct: Option<f64>,
    pub share_formula: String,
}

impl PositionPlan {
    /// Sum of the initial and both add-on tranches.
    pub fn tranche_total(&self) -> f64 {
        self.initial_position_pct + self.add_position_pct_1 + self.add_position_pct_2
    }

    /// Whole shares that risk exactly `risk_budget_pct` of `capital` if the
    /// stop is hit after entering at `entry_price`.
    ///
    /// `None` without a stop, or when the entry is not above the stop.
    pub fn suggested_shares(&self, capital: f64, entry_price: f64) -> Option<u64> {
        let stop = self.stop_price?;
        let per_share_risk = entry_price - stop;
        if per_share_risk <= 0.0 || capital <= 0.0 {
            return None;
        }
        let risk_amount = capital * self.risk_budget_pct / 100.0;
        Some((risk_amount / per_share_risk).floor() as u64)
    }
}
