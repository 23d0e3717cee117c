//! Market data: fetch capability, providers, and theme universe loading.

pub mod fetch;
pub mod provider;
pub mod synthetic;
pub mod twse;
pub mod universe;

pub use fetch::{FetchError, HttpFetcher, JsonFetcher, JsonRequest, Method};
pub use provider::{
    is_stock_symbol, parse_number, parse_value, DataError, Listing, MarketDataProvider,
    RevenueRecord,
};
pub use synthetic::SyntheticProvider;
pub use twse::{TwMarketProvider, ValuationCache};
pub use universe::load_theme_universe;
