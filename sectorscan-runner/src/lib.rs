//! SectorScan Runner: market data, run orchestration, reports.
//!
//! This crate builds on `sectorscan-core` to provide:
//! - A JSON fetch capability over blocking HTTP with retry and TLS fallback
//! - The TWSE / TPEx market data provider and a synthetic offline provider
//! - Theme universe loading (listing + revenue join, keyword matching)
//! - The screen runner producing a ranked, sized report
//! - Markdown / JSON / CSV report output
//! - TOML run configuration

pub mod config;
pub mod data;
pub mod report;
pub mod screen;

pub use config::{ConfigError, ReportFormat, ScreenConfig};
pub use data::{
    DataError, FetchError, HttpFetcher, JsonFetcher, MarketDataProvider, SyntheticProvider,
    TwMarketProvider,
};
pub use report::{report_filename, write_reports, ExportError};
pub use screen::{run_screen, ScreenError, ScreenParams, ScreenReport, SCHEMA_VERSION};
