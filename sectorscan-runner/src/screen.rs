//! Screen runner: one theme from universe to ranked report.
//!
//! Steps:
//! 1. load the theme universe (matching + revenue floor, largest first)
//! 2. fetch prices and valuation for the first `universe_limit` candidates,
//!    turning per-candidate failures into run warnings
//! 3. compute raw factors in parallel, then normalize, rank and size
//! 4. assemble the report text and fingerprint the data it was built from

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use sectorscan_core::domain::{Candidate, CandidateData, RawFactorSet};
use sectorscan_core::{select_picks, CategoryWeights, Pick, ScoringError, ThemeRegistry};

use crate::config::{ConfigError, ScreenConfig};
use crate::data::{load_theme_universe, DataError, MarketDataProvider};

/// Version of the serialized [`ScreenReport`].
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("no candidates found for theme '{theme}'")]
    EmptyUniverse { theme: String },

    #[error("data retrieval failed for every candidate of '{theme}'; nothing to score")]
    NoData { theme: String },

    #[error(transparent)]
    Weights(#[from] ScoringError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("loading universe: {0}")]
    Universe(#[from] DataError),
}

/// Resolved inputs of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenParams {
    pub theme: String,
    pub as_of: NaiveDate,
    pub top_n: usize,
    pub universe_limit: usize,
    pub min_monthly_revenue: f64,
    pub lookback: usize,
    pub capital: Option<f64>,
    pub weights: CategoryWeights,
}

impl ScreenParams {
    /// Resolve a validated configuration; `today` fills a missing as-of date.
    pub fn from_config(config: &ScreenConfig, today: NaiveDate) -> Result<Self, ConfigError> {
        config.validate()?;
        let s = &config.screen;
        Ok(Self {
            theme: s.theme.as_deref().unwrap_or_default().trim().to_string(),
            as_of: s.as_of.unwrap_or(today),
            top_n: s.top_n,
            universe_limit: s.universe_limit,
            min_monthly_revenue: s.min_monthly_revenue,
            lookback: s.lookback,
            capital: s.capital,
            weights: config.weights(),
        })
    }
}

/// Everything a report needs, in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub schema_version: u32,
    pub theme: String,
    pub as_of: NaiveDate,
    pub summary: String,
    pub method_notes: Vec<String>,
    pub picks: Vec<Pick>,
    pub risk_notes: Vec<String>,
    pub sources: Vec<String>,
    /// Candidates that reached scoring.
    pub scored_count: usize,
    /// Per-candidate retrieval failures.
    pub warnings: Vec<String>,
    /// BLAKE3 over the candidate data that was scored.
    pub dataset_hash: String,
    #[serde(default)]
    pub synthetic: bool,
}

/// Run one screen end to end.
pub fn run_screen(
    provider: &dyn MarketDataProvider,
    registry: &ThemeRegistry,
    params: &ScreenParams,
) -> Result<ScreenReport, ScreenError> {
    params.weights.validate()?;
    let theme = registry.normalize(&params.theme);
    let rule = registry.rule(&theme);
    info!(
        theme = %theme,
        as_of = %params.as_of,
        provider = provider.name(),
        known_theme = registry.is_known(&theme),
        "starting screen"
    );

    let universe = load_theme_universe(provider, &rule, params.min_monthly_revenue)?;
    if universe.is_empty() {
        return Err(ScreenError::EmptyUniverse {
            theme: params.theme.clone(),
        });
    }
    info!(
        matched = universe.len(),
        analysed = universe.len().min(params.universe_limit),
        "universe loaded"
    );

    let mut warnings = Vec::new();
    let batch: Vec<CandidateData> = universe
        .into_iter()
        .take(params.universe_limit)
        .filter_map(|candidate| fetch_candidate(provider, candidate, params, &mut warnings))
        .collect();
    if batch.is_empty() {
        return Err(ScreenError::NoData {
            theme: params.theme.clone(),
        });
    }

    let dataset_hash = compute_dataset_hash(&batch);
    let computed: Vec<Result<(Candidate, RawFactorSet), String>> = batch
        .into_par_iter()
        .map(|data| match RawFactorSet::compute(&data) {
            Ok(raw) => Ok((data.candidate, raw)),
            Err(e) => Err(format!("{} factors unavailable: {e}", data.candidate.symbol)),
        })
        .collect();
    let mut scored: Vec<(Candidate, RawFactorSet)> = Vec::with_capacity(computed.len());
    for outcome in computed {
        match outcome {
            Ok(entry) => scored.push(entry),
            Err(message) => {
                warn!(%message, "skipping candidate");
                warnings.push(message);
            }
        }
    }
    if scored.is_empty() {
        return Err(ScreenError::NoData {
            theme: params.theme.clone(),
        });
    }
    let scored_count = scored.len();

    let mut picks = select_picks(scored, &params.weights, params.top_n);
    if let Some(capital) = params.capital {
        picks = picks.into_iter().map(|p| p.with_capital(capital)).collect();
    }

    Ok(ScreenReport {
        schema_version: SCHEMA_VERSION,
        summary: summary(&params.theme, scored_count, &picks),
        method_notes: method_notes(),
        risk_notes: risk_notes(warnings.len()),
        sources: provider.sources(),
        theme: params.theme.clone(),
        as_of: params.as_of,
        picks,
        scored_count,
        warnings,
        dataset_hash,
        synthetic: provider.name() == "synthetic",
    })
}

/// Prices and valuation for one candidate.
///
/// A price failure drops the candidate; a valuation failure keeps it with
/// no valuation. Both are recorded as warnings.
fn fetch_candidate(
    provider: &dyn MarketDataProvider,
    candidate: Candidate,
    params: &ScreenParams,
    warnings: &mut Vec<String>,
) -> Option<CandidateData> {
    let symbol = candidate.symbol.as_str();
    let prices =
        match provider.price_history(symbol, candidate.market, params.as_of, params.lookback) {
            Ok(prices) => prices,
            Err(e) => {
                warn!(symbol, error = %e, "price history failed, skipping");
                warnings.push(format!("{symbol} price history failed: {e}"));
                return None;
            }
        };
    let valuation = match provider.latest_valuation(symbol, candidate.market, params.as_of) {
        Ok(v) => v,
        Err(e) => {
            warn!(symbol, error = %e, "valuation failed, scoring without it");
            warnings.push(format!("{symbol} valuation failed: {e}"));
            None
        }
    };
    debug!(symbol, points = prices.len(), has_valuation = valuation.is_some(), "fetched");
    Some(CandidateData::new(candidate, prices, valuation))
}

fn summary(theme: &str, scored_count: usize, picks: &[Pick]) -> String {
    let Some(first) = picks.first() else {
        return format!("{theme}: no results to report.");
    };
    let avg = picks.iter().map(|p| p.total_score).sum::<f64>() / picks.len() as f64;
    format!(
        "{theme}: scored {scored_count} candidates; the top {} average {avg:.1}. \
         #1 is {} {}; still scale in and manage risk.",
        picks.len(),
        first.symbol,
        first.name,
    )
}

fn method_notes() -> Vec<String> {
    [
        "Momentum (63/126-day returns) is ranked within the theme by percentile, not against fixed thresholds.",
        "Value (PE / PB / dividend yield) is compared within the peer group to avoid cross-industry distortion.",
        "Fundamentals use monthly revenue YoY / MoM as a short-to-medium-term filter.",
        "The risk overlay (volatility and liquidity) caps position size and does not override the trend signal.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn risk_notes(failed: usize) -> Vec<String> {
    let mut notes: Vec<String> = [
        "This is a research ranking, not a guarantee of returns; pair it with your own trading system and stop rules.",
        "Theme stocks rotate quickly; reduce exposure if volume dries up or key moving averages break.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if failed > 0 {
        notes.push(format!(
            "Data warning: {failed} candidate(s) failed to load; results may carry sampling bias."
        ));
    }
    notes
}

/// Deterministic BLAKE3 hash over the scored data, in symbol order.
pub fn compute_dataset_hash(batch: &[CandidateData]) -> String {
    let mut ordered: Vec<&CandidateData> = batch.iter().collect();
    ordered.sort_by(|a, b| a.candidate.symbol.cmp(&b.candidate.symbol));

    let mut hasher = blake3::Hasher::new();
    for data in ordered {
        hasher.update(data.candidate.symbol.as_bytes());
        hasher.update(data.candidate.market.as_str().as_bytes());
        for p in &data.prices {
            hasher.update(p.date.to_string().as_bytes());
            hasher.update(&p.open.to_le_bytes());
            hasher.update(&p.high.to_le_bytes());
            hasher.update(&p.low.to_le_bytes());
            hasher.update(&p.close.to_le_bytes());
            hasher.update(&p.volume.to_le_bytes());
        }
        if let Some(v) = &data.valuation {
            hasher.update(&v.pe.to_le_bytes());
            hasher.update(&v.pb.to_le_bytes());
            hasher.update(&v.dividend_yield.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectorscan_core::domain::{Market, PricePoint};

    fn data(symbol: &str, close: f64) -> CandidateData {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        CandidateData::new(
            Candidate {
                symbol: symbol.into(),
                market: Market::Twse,
                name: symbol.into(),
                industry: String::new(),
                monthly_revenue: 0.0,
                revenue_yoy: None,
                revenue_mom: None,
            },
            vec![PricePoint::new(date, close, close, close, close, 10)],
            None,
        )
    }

    #[test]
    fn dataset_hash_ignores_batch_order() {
        let a = compute_dataset_hash(&[data("2330", 100.0), data("2454", 50.0)]);
        let b = compute_dataset_hash(&[data("2454", 50.0), data("2330", 100.0)]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn dataset_hash_changes_with_data() {
        let a = compute_dataset_hash(&[data("2330", 100.0)]);
        let b = compute_dataset_hash(&[data("2330", 100.5)]);
        assert_ne!(a, b);
    }

    #[test]
    fn risk_notes_add_data_warning() {
        assert_eq!(risk_notes(0).len(), 2);
        let notes = risk_notes(3);
        assert_eq!(notes.len(), 3);
        assert!(notes[2].contains("3 candidate(s)"));
    }

    #[test]
    fn empty_summary() {
        assert_eq!(summary("AI", 0, &[]), "AI: no results to report.");
    }

    #[test]
    fn params_default_as_of_to_today() {
        let mut cfg = ScreenConfig::default();
        cfg.screen.theme = Some(" 記憶體 ".into());
        let today = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let params = ScreenParams::from_config(&cfg, today).unwrap();
        assert_eq!(params.as_of, today);
        assert_eq!(params.theme, "記憶體");
        assert_eq!(params.top_n, 10);
    }
}
