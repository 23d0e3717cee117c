//! RawFactorSet: the per-candidate values the normalizer ranks.

use serde::{Deserialize, Serialize};

/// Raw technical, valuation, liquidity and fundamental values for one
/// candidate. Each field is `None` when the history or snapshot does not
/// support it; `trend_score` is always computable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFactorSet {
    pub close: f64,
    pub sma20: Option<f64>,
    pub sma60: Option<f64>,
    pub sma120: Option<f64>,
    pub rsi14: Option<f64>,
    pub atr14: Option<f64>,
    pub volatility20: Option<f64>,
    pub momentum63: Option<f64>,
    pub momentum126: Option<f64>,
    pub liquidity20: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub revenue_mom: Option<f64>,
    pub trend_score: f64,
}
