//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (the live
//! TWSE/TPEx endpoints, the synthetic generator, in-memory fixtures) so the
//! screen can run against any of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use sectorscan_core::domain::{Market, PricePoint, Valuation};

use super::fetch::FetchError;

#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no price history for {symbol} ({market})")]
    NoPriceHistory { symbol: String, market: Market },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// A listed company from an exchange's basic-information table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub name: String,
    pub industry: String,
    pub market: Market,
}

/// Latest monthly revenue figures for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub symbol: String,
    pub industry: String,
    pub monthly_revenue: f64,
    pub revenue_mom: Option<f64>,
    pub revenue_yoy: Option<f64>,
}

/// Source of listings, revenue, prices and valuations.
///
/// Implementations are blocking and called from a single thread; they must
/// still be `Send + Sync` so a run can be moved to a worker.
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Data sources credited in the report.
    fn sources(&self) -> Vec<String>;

    /// Every listed common stock. Later entries override earlier ones with
    /// the same symbol.
    fn listings(&self) -> Result<Vec<Listing>, DataError>;

    /// Latest monthly revenue per company.
    fn revenue(&self) -> Result<Vec<RevenueRecord>, DataError>;

    /// Up to `lookback` daily points on or before `as_of`, ascending by date.
    fn price_history(
        &self,
        symbol: &str,
        market: Market,
        as_of: NaiveDate,
        lookback: usize,
    ) -> Result<Vec<PricePoint>, DataError>;

    /// Most recent valuation on or before `as_of`, if one can be found.
    fn latest_valuation(
        &self,
        symbol: &str,
        market: Market,
        as_of: NaiveDate,
    ) -> Result<Option<Valuation>, DataError>;
}

/// Tokens the exchanges use for "no value".
const NULL_TOKENS: [&str; 7] = ["", "--", "-", "X", "N/A", "None", "nan"];

/// Parse an exchange number: strips thousands separators and a leading `+`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if NULL_TOKENS.contains(&cleaned.as_str()) {
        return None;
    }
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`parse_number`] over a JSON cell that may be a string or a number.
pub fn parse_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Common stocks have four-digit codes; anything else is an ETF, warrant
/// or preferred share.
pub fn is_stock_symbol(symbol: &str) -> bool {
    symbol.len() == 4 && symbol.bytes().all(|b| b.is_ascii_digit())
}
