//! Candidate: a listed company considered for a theme, plus the data the
//! scoring engine needs about it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::price::PricePoint;

/// Exchange the symbol is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Market {
    /// Taiwan Stock Exchange (main board).
    #[serde(rename = "TWSE")]
    Twse,
    /// Taipei Exchange (OTC board).
    #[serde(rename = "TPEx")]
    Tpex,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Twse => "TWSE",
            Market::Tpex => "TPEx",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A company matched to a theme.
///
/// Revenue growth figures are percentages and are `None` when the exchange
/// publishes no comparable figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub market: Market,
    pub name: String,
    pub industry: String,
    pub monthly_revenue: f64,
    pub revenue_yoy: Option<f64>,
    pub revenue_mom: Option<f64>,
}

/// Valuation snapshot for one trading day.
///
/// A `0.0` field means the exchange listed the symbol but the ratio is not
/// meaningful (loss-making company, no dividend).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Valuation {
    pub pe: f64,
    pub pb: f64,
    pub dividend_yield: f64,
}

/// Everything the scoring engine consumes for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateData {
    pub candidate: Candidate,
    pub prices: Vec<PricePoint>,
    pub valuation: Option<Valuation>,
}

impl CandidateData {
    pub fn new(candidate: Candidate, prices: Vec<PricePoint>, valuation: Option<Valuation>) -> Self {
        Self {
            candidate,
            prices,
            valuation,
        }
    }

    /// Most recent close, if the series is non-empty.
    pub fn last_close(&self) -> Option<f64> {
        self.prices.last().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_display_matches_exchange_code() {
        assert_eq!(Market::Twse.to_string(), "TWSE");
        assert_eq!(Market::Tpex.to_string(), "TPEx");
    }

    #[test]
    fn market_serde_uses_exchange_code() {
        let json = serde_json::to_string(&Market::Tpex).unwrap();
        assert_eq!(json, "\"TPEx\"");
        let back: Market = serde_json::from_str("\"TWSE\"").unwrap();
        assert_eq!(back, Market::Twse);
    }
}
