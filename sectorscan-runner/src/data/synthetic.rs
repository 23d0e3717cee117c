//! Deterministic offline provider for demos and tests.
//!
//! Listings are the seed symbols of every registered theme. Prices are a
//! random walk, and revenue and valuations are drawn from plausible ranges.
//! Every stream is seeded from a BLAKE3 hash of the symbol, so the same
//! symbol always yields the same data. The output is clearly fake and the
//! report is tagged as synthetic.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sectorscan_core::domain::{Market, PricePoint, Valuation};
use sectorscan_core::ThemeRegistry;

use super::provider::{DataError, Listing, MarketDataProvider, RevenueRecord};

/// Seeded RNG for one (stream, symbol) pair.
fn rng_for(stream: &str, symbol: &str) -> StdRng {
    let hash = blake3::hash(format!("{stream}:{symbol}").as_bytes());
    StdRng::from_seed(*hash.as_bytes())
}

pub struct SyntheticProvider {
    listings: Vec<Listing>,
}

impl SyntheticProvider {
    /// One listing per distinct seed symbol across the registry's themes.
    pub fn from_registry(registry: &ThemeRegistry) -> Self {
        let mut by_symbol: BTreeMap<String, Listing> = BTreeMap::new();
        for theme in registry.theme_names() {
            let rule = registry.rule(theme);
            let industry = rule
                .industry_keywords
                .first()
                .cloned()
                .unwrap_or_else(|| theme.to_string());
            for symbol in &rule.seed_symbols {
                by_symbol.entry(symbol.clone()).or_insert_with(|| Listing {
                    symbol: symbol.clone(),
                    name: format!("Synthetic {symbol}"),
                    industry: industry.clone(),
                    market: synthetic_market(symbol),
                });
            }
        }
        Self {
            listings: by_symbol.into_values().collect(),
        }
    }
}

fn synthetic_market(symbol: &str) -> Market {
    if blake3::hash(symbol.as_bytes()).as_bytes()[0] % 3 == 0 {
        Market::Tpex
    } else {
        Market::Twse
    }
}

/// `count` weekdays ending on or before `end`, ascending.
fn trading_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut current = end;
    while days.len() < count {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        current -= Duration::days(1);
    }
    days.reverse();
    days
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn sources(&self) -> Vec<String> {
        vec!["Synthetic random walk (not market data)".to_string()]
    }

    fn listings(&self) -> Result<Vec<Listing>, DataError> {
        Ok(self.listings.clone())
    }

    fn revenue(&self) -> Result<Vec<RevenueRecord>, DataError> {
        Ok(self
            .listings
            .iter()
            .map(|l| {
                let mut rng = rng_for("revenue", &l.symbol);
                RevenueRecord {
                    symbol: l.symbol.clone(),
                    industry: l.industry.clone(),
                    monthly_revenue: rng.gen_range(1.0e8..5.0e10_f64).round(),
                    revenue_mom: Some(rng.gen_range(-20.0..20.0_f64)),
                    revenue_yoy: Some(rng.gen_range(-30.0..80.0_f64)),
                }
            })
            .collect())
    }

    fn price_history(
        &self,
        symbol: &str,
        market: Market,
        as_of: NaiveDate,
        lookback: usize,
    ) -> Result<Vec<PricePoint>, DataError> {
        if lookback == 0 {
            return Err(DataError::NoPriceHistory {
                symbol: symbol.to_string(),
                market,
            });
        }
        let mut rng = rng_for("prices", symbol);
        let drift: f64 = rng.gen_range(-0.001..0.002);
        let mut price: f64 = rng.gen_range(20.0..800.0);

        Ok(trading_days(as_of, lookback)
            .into_iter()
            .map(|date| {
                let daily_return = drift + rng.gen_range(-0.03..0.03);
                let open = price;
                let close = (price * (1.0 + daily_return)).max(1.0);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                let volume = rng.gen_range(200_000..20_000_000u64);
                price = close;
                PricePoint::new(date, open, high, low, close, volume)
            })
            .collect())
    }

    fn latest_valuation(
        &self,
        symbol: &str,
        _market: Market,
        _as_of: NaiveDate,
    ) -> Result<Option<Valuation>, DataError> {
        let mut rng = rng_for("valuation", symbol);
        // Roughly one in eight symbols has no valuation row.
        if rng.gen_range(0..8) == 0 {
            return Ok(None);
        }
        Ok(Some(Valuation {
            pe: rng.gen_range(5.0..40.0),
            pb: rng.gen_range(0.5..8.0),
            dividend_yield: rng.gen_range(0.0..6.0),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        SyntheticProvider::from_registry(&ThemeRegistry::builtin())
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    #[test]
    fn listings_cover_seed_symbols_once() {
        let listings = provider().listings().unwrap();
        let symbols: Vec<&str> = listings.iter().map(|l| l.symbol.as_str()).collect();
        assert!(symbols.contains(&"2330"));
        assert!(symbols.contains(&"8299"));
        let mut dedup = symbols.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), symbols.len());
    }

    #[test]
    fn prices_are_deterministic_and_sane() {
        let p = provider();
        let a = p.price_history("2330", Market::Twse, as_of(), 252).unwrap();
        let b = p.price_history("2330", Market::Twse, as_of(), 252).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 252);
        assert!(a.iter().all(|pt| pt.is_sane()));
        assert!(a.windows(2).all(|w| w[0].date < w[1].date));
        assert!(a.last().unwrap().date <= as_of());
    }

    #[test]
    fn different_symbols_differ() {
        let p = provider();
        let a = p.price_history("2330", Market::Twse, as_of(), 30).unwrap();
        let b = p.price_history("2454", Market::Twse, as_of(), 30).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn trading_days_skip_weekends() {
        // 2026-02-22 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 2, 22).unwrap();
        let days = trading_days(sunday, 3);
        assert_eq!(days.last().unwrap(), &as_of());
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn revenue_is_positive() {
        let p = provider();
        for r in p.revenue().unwrap() {
            assert!(r.monthly_revenue > 0.0);
        }
    }
}
