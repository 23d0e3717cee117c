//! TWSE / TPEx market data provider.
//!
//! Reads four kinds of public data from both exchanges:
//! - basic company information (OpenAPI, one JSON array per market)
//! - latest monthly revenue (OpenAPI)
//! - daily prices, one calendar month per request
//! - daily PE / PB / dividend-yield tables, one trading day per request
//!
//! Valuation tables are shared by every candidate on the same market and
//! day, so they are cached for the lifetime of the provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde_json::Value;
use tracing::{debug, warn};

use sectorscan_core::domain::{Market, PricePoint, Valuation};

use super::fetch::{JsonFetcher, JsonRequest};
use super::provider::{
    is_stock_symbol, parse_value, DataError, Listing, MarketDataProvider, RevenueRecord,
};

pub const TWSE_BASICS_URL: &str = "https://openapi.twse.com.tw/v1/opendata/t187ap03_L";
pub const TWSE_REVENUE_URL: &str = "https://openapi.twse.com.tw/v1/opendata/t187ap05_L";
pub const TWSE_STOCK_DAY_URL: &str = "https://www.twse.com.tw/exchangeReport/STOCK_DAY";
pub const TWSE_BWIBBU_URL: &str = "https://www.twse.com.tw/exchangeReport/BWIBBU_d";

pub const TPEX_BASICS_URL: &str = "https://www.tpex.org.tw/openapi/v1/mopsfin_t187ap03_O";
pub const TPEX_REVENUE_URL: &str = "https://www.tpex.org.tw/openapi/v1/mopsfin_t187ap05_O";
pub const TPEX_TRADING_STOCK_URL: &str =
    "https://www.tpex.org.tw/www/zh-tw/afterTrading/tradingStock";
pub const TPEX_PE_QRY_DATE_URL: &str = "https://www.tpex.org.tw/www/zh-tw/afterTrading/peQryDate";

/// Days walked back from the as-of date looking for a valuation.
pub const MAX_VALUATION_BACKTRACK_DAYS: i64 = 20;

/// Offset between the ROC (Minguo) calendar and the Gregorian year.
const ROC_YEAR_OFFSET: i32 = 1911;

/// Per-row valuation table for one market and day.
pub type ValuationTable = HashMap<String, Valuation>;

/// Valuation tables keyed by (market, trading day).
///
/// Empty tables are cached too, so a holiday is only requested once.
#[derive(Debug, Default)]
pub struct ValuationCache {
    tables: Mutex<HashMap<(Market, NaiveDate), Arc<ValuationTable>>>,
}

impl ValuationCache {
    pub fn get(&self, market: Market, date: NaiveDate) -> Option<Arc<ValuationTable>> {
        self.lock().get(&(market, date)).cloned()
    }

    pub fn insert(&self, market: Market, date: NaiveDate, table: ValuationTable) -> Arc<ValuationTable> {
        let table = Arc::new(table);
        self.lock().insert((market, date), Arc::clone(&table));
        table
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Market, NaiveDate), Arc<ValuationTable>>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Live provider over the TWSE and TPEx endpoints.
pub struct TwMarketProvider<F: JsonFetcher> {
    fetcher: F,
    valuations: ValuationCache,
}

impl<F: JsonFetcher> TwMarketProvider<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            valuations: ValuationCache::default(),
        }
    }

    pub fn valuation_cache(&self) -> &ValuationCache {
        &self.valuations
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch an OpenAPI array; failures degrade to an empty table.
    fn open_api_rows(&self, url: &str) -> Vec<Value> {
        match self.fetcher.fetch_json(&JsonRequest::get(url)) {
            Ok(Value::Array(rows)) => rows,
            Ok(_) => {
                warn!(url, "expected a JSON array, treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(url, error = %e, "table unavailable, treating as empty");
                Vec::new()
            }
        }
    }

    fn month_request(symbol: &str, market: Market, month: NaiveDate) -> JsonRequest {
        match market {
            Market::Twse => JsonRequest::get(TWSE_STOCK_DAY_URL)
                .param("response", "json")
                .param("date", month.format("%Y%m01").to_string())
                .param("stockNo", symbol),
            Market::Tpex => JsonRequest::post_form(TPEX_TRADING_STOCK_URL)
                .param("code", symbol)
                .param("date", month.format("%Y/%m/01").to_string())
                .param("response", "json"),
        }
    }

    fn valuation_request(market: Market, date: NaiveDate) -> JsonRequest {
        match market {
            Market::Twse => JsonRequest::get(TWSE_BWIBBU_URL)
                .param("response", "json")
                .param("date", date.format("%Y%m%d").to_string())
                .param("selectType", "ALL"),
            Market::Tpex => JsonRequest::post_form(TPEX_PE_QRY_DATE_URL)
                .param("date", date.format("%Y/%m/%d").to_string())
                .param("response", "json"),
        }
    }

    fn valuation_table(&self, market: Market, date: NaiveDate) -> Result<Arc<ValuationTable>, DataError> {
        if let Some(table) = self.valuations.get(market, date) {
            return Ok(table);
        }
        let payload = self.fetcher.fetch_json(&Self::valuation_request(market, date))?;
        let table = parse_valuation_table(market, &payload);
        debug!(%market, %date, rows = table.len(), "valuation table loaded");
        Ok(self.valuations.insert(market, date, table))
    }
}

impl<F: JsonFetcher> MarketDataProvider for TwMarketProvider<F> {
    fn name(&self) -> &str {
        "twse_tpex"
    }

    fn sources(&self) -> Vec<String> {
        [
            "TWSE OpenAPI",
            "TWSE exchangeReport",
            "TPEx OpenAPI",
            "TPEx afterTrading API",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn listings(&self) -> Result<Vec<Listing>, DataError> {
        let mut out = Vec::new();
        for row in self.open_api_rows(TWSE_BASICS_URL) {
            out.extend(listing_from_row(&row, Market::Twse));
        }
        for row in self.open_api_rows(TPEX_BASICS_URL) {
            out.extend(listing_from_row(&row, Market::Tpex));
        }
        Ok(out)
    }

    fn revenue(&self) -> Result<Vec<RevenueRecord>, DataError> {
        let mut out = Vec::new();
        for url in [TWSE_REVENUE_URL, TPEX_REVENUE_URL] {
            out.extend(self.open_api_rows(url).iter().filter_map(revenue_from_row));
        }
        Ok(out)
    }

    fn price_history(
        &self,
        symbol: &str,
        market: Market,
        as_of: NaiveDate,
        lookback: usize,
    ) -> Result<Vec<PricePoint>, DataError> {
        let anchor = first_of_month(as_of);
        let mut collected: Vec<PricePoint> = Vec::new();

        for month in month_windows(anchor, months_to_walk(lookback)) {
            let payload = self
                .fetcher
                .fetch_json(&Self::month_request(symbol, market, month))?;
            let Some(rows) = month_rows(market, &payload)? else {
                debug!(symbol, %month, "no data for month");
                continue;
            };
            collected.extend(
                rows.iter()
                    .filter_map(|row| price_from_row(row, as_of))
                    .filter(PricePoint::is_sane),
            );
            if collected.len() >= lookback {
                break;
            }
        }

        if collected.is_empty() {
            return Err(DataError::NoPriceHistory {
                symbol: symbol.to_string(),
                market,
            });
        }
        Ok(finalize_history(collected, lookback))
    }

    fn latest_valuation(
        &self,
        symbol: &str,
        market: Market,
        as_of: NaiveDate,
    ) -> Result<Option<Valuation>, DataError> {
        for back in 0..=MAX_VALUATION_BACKTRACK_DAYS {
            let date = as_of - Duration::days(back);
            let table = self.valuation_table(market, date)?;
            if let Some(valuation) = table.get(symbol) {
                return Ok(Some(*valuation));
            }
        }
        Ok(None)
    }
}

// ── Parsing helpers ──────────────────────────────────────────────────

/// First string-ish, non-empty value among `keys`, trimmed.
fn text_field(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn listing_from_row(row: &Value, market: Market) -> Option<Listing> {
    let (code, names, industry) = match market {
        Market::Twse => ("公司代號", ["公司簡稱", "公司名稱"], "產業別"),
        Market::Tpex => (
            "SecuritiesCompanyCode",
            ["CompanyAbbreviation", "CompanyName"],
            "SecuritiesIndustryCode",
        ),
    };
    let symbol = text_field(row, &[code]);
    if !is_stock_symbol(&symbol) {
        return None;
    }
    Some(Listing {
        symbol,
        name: text_field(row, &names),
        industry: text_field(row, &[industry]),
        market,
    })
}

fn revenue_from_row(row: &Value) -> Option<RevenueRecord> {
    let symbol = text_field(row, &["公司代號"]);
    if !is_stock_symbol(&symbol) {
        return None;
    }
    let number = |key: &str| row.get(key).and_then(parse_value);
    Some(RevenueRecord {
        symbol,
        industry: text_field(row, &["產業別"]),
        monthly_revenue: number("營業收入-當月營收").unwrap_or(0.0),
        revenue_mom: number("營業收入-上月比較增減(%)"),
        revenue_yoy: number("營業收入-去年同月增減(%)"),
    })
}

/// Parse an ROC calendar date such as `114/02/20`.
pub fn parse_roc_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/').map(|p| p.trim().parse::<u32>().ok());
    let year = parts.next()??;
    let month = parts.next()??;
    let day = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32 + ROC_YEAR_OFFSET, month, day)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Calendar months to request for a lookback of trading days.
pub fn months_to_walk(lookback: usize) -> usize {
    (lookback / 18 + 6).max(6)
}

/// `count` month starts walking back from `anchor`, anchor first.
fn month_windows(anchor: NaiveDate, count: usize) -> impl Iterator<Item = NaiveDate> {
    (0..count as u32).filter_map(move |i| anchor.checked_sub_months(Months::new(i)))
}

/// Data rows of a monthly price payload, or `None` when the exchange
/// reports no data for the month. A success status without a row array is
/// malformed.
fn month_rows(market: Market, payload: &Value) -> Result<Option<&Vec<Value>>, DataError> {
    let (ok, rows) = match market {
        Market::Twse => ("OK", payload.get("data")),
        Market::Tpex => (
            "ok",
            payload
                .get("tables")
                .and_then(|t| t.get(0))
                .and_then(|t| t.get("data")),
        ),
    };
    if payload.get("stat").and_then(Value::as_str) != Some(ok) {
        return Ok(None);
    }
    rows.and_then(Value::as_array)
        .map(Some)
        .ok_or_else(|| DataError::Malformed(format!("{market} daily prices: missing data rows")))
}

/// One daily row: date, volume, _, open, high, low, close, ...
fn price_from_row(row: &Value, as_of: NaiveDate) -> Option<PricePoint> {
    let cells = row.as_array().filter(|c| c.len() >= 7)?;
    let date = parse_roc_date(cells[0].as_str()?)?;
    if date > as_of {
        return None;
    }
    let volume = parse_value(&cells[1])?;
    let open = parse_value(&cells[3])?;
    let high = parse_value(&cells[4])?;
    let low = parse_value(&cells[5])?;
    let close = parse_value(&cells[6])?;
    Some(PricePoint::new(
        date,
        open,
        high,
        low,
        close,
        volume.max(0.0).round() as u64,
    ))
}

/// Deduplicate by date (last wins), sort ascending, keep the newest `lookback`.
fn finalize_history(points: Vec<PricePoint>, lookback: usize) -> Vec<PricePoint> {
    let by_date: std::collections::BTreeMap<NaiveDate, PricePoint> =
        points.into_iter().map(|p| (p.date, p)).collect();
    let skip = by_date.len().saturating_sub(lookback);
    by_date.into_values().skip(skip).collect()
}

/// Build a symbol → valuation table from a day's payload.
///
/// Columns are located by header; non-positive PE/PB and negative yields
/// are stored as 0.
pub fn parse_valuation_table(market: Market, payload: &Value) -> ValuationTable {
    let (ok, table, code_header) = match market {
        Market::Twse => ("OK", Some(payload), "證券代號"),
        Market::Tpex => ("ok", payload.get("tables").and_then(|t| t.get(0)), "股票代號"),
    };
    if payload.get("stat").and_then(Value::as_str) != Some(ok) {
        return ValuationTable::new();
    }
    let Some(table) = table else {
        return ValuationTable::new();
    };

    let headers: Vec<String> = table
        .get("fields")
        .and_then(Value::as_array)
        .map(|f| {
            f.iter()
                .map(|h| h.as_str().unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let code_idx = column(code_header).unwrap_or(0);
    let pe_idx = column("本益比");
    let pb_idx = column("股價淨值比");
    let dy_idx = column("殖利率(%)");

    let rows = table.get("data").and_then(Value::as_array);
    rows.into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .filter_map(|cells| {
            let symbol = match cells.get(code_idx)? {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).and_then(parse_value);
            let valuation = Valuation {
                pe: cell(pe_idx).filter(|v| *v > 0.0).unwrap_or(0.0),
                pb: cell(pb_idx).filter(|v| *v > 0.0).unwrap_or(0.0),
                dividend_yield: cell(dy_idx).filter(|v| *v >= 0.0).unwrap_or(0.0),
            };
            Some((symbol, valuation))
        })
        .collect()
}
