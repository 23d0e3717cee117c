//! Raw factor computation: one candidate's price history and snapshot in,
//! a [`RawFactorSet`] out.
//!
//! Computation is independent per candidate; callers may run it in parallel
//! before the normalizer's batch barrier.

use thiserror::Error;

use crate::domain::{CandidateData, PricePoint, RawFactorSet, Valuation};
use crate::indicators::{
    trend_score, Atr, Indicator, Liquidity, MomentumReturn, Rsi, Sma, Volatility,
};

#[derive(Debug, Error, PartialEq)]
pub enum FactorError {
    #[error("no price history for '{symbol}'")]
    EmptySeries { symbol: String },
}

/// Indicator windows used to build a factor set.
#[derive(Debug, Clone)]
pub struct FactorIndicators {
    pub sma_short: Sma,
    pub sma_medium: Sma,
    pub sma_long: Sma,
    pub rsi: Rsi,
    pub atr: Atr,
    pub volatility: Volatility,
    pub momentum_medium: MomentumReturn,
    pub momentum_long: MomentumReturn,
    pub liquidity: Liquidity,
}

impl Default for FactorIndicators {
    fn default() -> Self {
        Self {
            sma_short: Sma::new(20),
            sma_medium: Sma::new(60),
            sma_long: Sma::new(120),
            rsi: Rsi::new(14),
            atr: Atr::new(14),
            volatility: Volatility::new(20),
            momentum_medium: MomentumReturn::new(63),
            momentum_long: MomentumReturn::new(126),
            liquidity: Liquidity::new(20),
        }
    }
}

impl FactorIndicators {
    /// Build the factor set for one candidate.
    pub fn compute(&self, data: &CandidateData) -> Result<RawFactorSet, FactorError> {
        let close = data
            .last_close()
            .ok_or_else(|| FactorError::EmptySeries {
                symbol: data.candidate.symbol.clone(),
            })?;
        let prices: &[PricePoint] = &data.prices;

        let sma20 = self.sma_short.value(prices);
        let sma60 = self.sma_medium.value(prices);
        let sma120 = self.sma_long.value(prices);
        let rsi14 = self.rsi.value(prices);
        let valuation = data.valuation.as_ref();

        Ok(RawFactorSet {
            close,
            sma20,
            sma60,
            sma120,
            rsi14,
            atr14: self.atr.value(prices),
            volatility20: self.volatility.value(prices),
            momentum63: self.momentum_medium.value(prices),
            momentum126: self.momentum_long.value(prices),
            liquidity20: self.liquidity.value(prices),
            pe: valuation.map(|v: &Valuation| v.pe),
            pb: valuation.map(|v| v.pb),
            dividend_yield: valuation.map(|v| v.dividend_yield),
            revenue_yoy: data.candidate.revenue_yoy,
            revenue_mom: data.candidate.revenue_mom,
            trend_score: trend_score(close, sma20, sma60, sma120, rsi14),
        })
    }
}

impl RawFactorSet {
    /// Factor set with the default indicator windows.
    pub fn compute(data: &CandidateData) -> Result<Self, FactorError> {
        FactorIndicators::default().compute(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, Market};
    use crate::indicators::make_prices;

    fn candidate() -> Candidate {
        Candidate {
            symbol: "2330".into(),
            market: Market::Twse,
            name: "TSMC".into(),
            industry: "Semiconductors".into(),
            monthly_revenue: 2.6e11,
            revenue_yoy: Some(35.0),
            revenue_mom: Some(-2.5),
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        let data = CandidateData::new(candidate(), vec![], None);
        assert_eq!(
            RawFactorSet::compute(&data),
            Err(FactorError::EmptySeries {
                symbol: "2330".into()
            })
        );
    }

    #[test]
    fn short_history_yields_nulls_not_errors() {
        let data = CandidateData::new(candidate(), make_prices(&[100.0, 101.0, 102.0]), None);
        let raw = RawFactorSet::compute(&data).unwrap();
        assert_eq!(raw.close, 102.0);
        assert_eq!(raw.sma20, None);
        assert_eq!(raw.rsi14, None);
        assert_eq!(raw.atr14, None);
        assert_eq!(raw.volatility20, None);
        assert_eq!(raw.momentum63, None);
        assert_eq!(raw.liquidity20, None);
        assert_eq!(raw.pe, None);
        assert_eq!(raw.trend_score, 50.0);
        assert_eq!(raw.revenue_yoy, Some(35.0));
    }

    #[test]
    fn full_history_fills_every_technical_factor() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.5).collect();
        let valuation = Valuation {
            pe: 18.0,
            pb: 4.2,
            dividend_yield: 1.9,
        };
        let data = CandidateData::new(candidate(), make_prices(&closes), Some(valuation));
        let raw = RawFactorSet::compute(&data).unwrap();
        assert!(raw.sma120.is_some());
        assert!(raw.atr14.is_some());
        assert!(raw.volatility20.is_some());
        assert!(raw.momentum126.is_some());
        assert!(raw.liquidity20.is_some());
        assert_eq!(raw.pe, Some(18.0));
        assert_eq!(raw.dividend_yield, Some(1.9));
        // steady uptrend: bullish alignment, RSI 100 (overbought)
        assert_eq!(raw.trend_score, 72.0);
    }
}
