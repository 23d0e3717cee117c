//! Theme universe: join listings with revenue and keep theme members.

use std::collections::BTreeMap;

use tracing::debug;

use sectorscan_core::domain::Candidate;
use sectorscan_core::ThemeRule;

use super::provider::{DataError, Listing, MarketDataProvider, RevenueRecord};

/// Companies matching `rule` with at least `min_monthly_revenue`, largest
/// monthly revenue first.
///
/// The industry label comes from the revenue table when it has one, else
/// from the listing. Companies without a revenue row count as zero revenue.
/// Equal revenues keep symbol order.
pub fn load_theme_universe(
    provider: &dyn MarketDataProvider,
    rule: &ThemeRule,
    min_monthly_revenue: f64,
) -> Result<Vec<Candidate>, DataError> {
    let listings: BTreeMap<String, Listing> = provider
        .listings()?
        .into_iter()
        .map(|l| (l.symbol.clone(), l))
        .collect();
    let revenue: BTreeMap<String, RevenueRecord> = provider
        .revenue()?
        .into_iter()
        .map(|r| (r.symbol.clone(), r))
        .collect();

    let mut universe: Vec<Candidate> = listings
        .into_values()
        .filter_map(|listing| {
            let rev = revenue.get(&listing.symbol);
            let industry = rev
                .map(|r| r.industry.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(&listing.industry)
                .to_string();
            if !rule.matches(&listing.symbol, &listing.name, &industry) {
                return None;
            }
            let monthly_revenue = rev.map(|r| r.monthly_revenue).unwrap_or(0.0);
            if monthly_revenue < min_monthly_revenue {
                debug!(symbol = %listing.symbol, monthly_revenue, "below revenue floor");
                return None;
            }
            Some(Candidate {
                symbol: listing.symbol,
                market: listing.market,
                name: listing.name,
                industry,
                monthly_revenue,
                revenue_yoy: rev.and_then(|r| r.revenue_yoy),
                revenue_mom: rev.and_then(|r| r.revenue_mom),
            })
        })
        .collect();

    universe.sort_by(|a, b| b.monthly_revenue.total_cmp(&a.monthly_revenue));
    Ok(universe)
}
