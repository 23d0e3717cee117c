//! Trend score: absolute 0-100 reading of moving-average alignment and RSI
//! regime. Not re-normalized against the batch.

/// Base score before adjustments.
const BASE: f64 = 50.0;

/// Score in [0, 100] from close, three moving averages and RSI.
///
/// Moving-average term (only when all three are present):
/// - +30 for full bullish alignment `close > sma20 > sma60 > sma120`
/// - -30 for full bearish alignment `close < sma20 < sma60 < sma120`
/// - otherwise +10 if `close > sma20`, else -10
///
/// RSI term (when present): +10 in [45, 65], -8 above 75, +5 below 30.
pub fn trend_score(
    close: f64,
    sma20: Option<f64>,
    sma60: Option<f64>,
    sma120: Option<f64>,
    rsi14: Option<f64>,
) -> f64 {
    let mut score = BASE;

    if let (Some(s20), Some(s60), Some(s120)) = (sma20, sma60, sma120) {
        score += if close > s20 && s20 > s60 && s60 > s120 {
            30.0
        } else if close < s20 && s20 < s60 && s60 < s120 {
            -30.0
        } else if close > s20 {
            10.0
        } else {
            -10.0
        };
    }

    if let Some(rsi) = rsi14 {
        if (45.0..=65.0).contains(&rsi) {
            score += 10.0;
        } else if rsi > 75.0 {
            score -= 8.0;
        } else if rsi < 30.0 {
            score += 5.0;
        }
    }

    score.clamp(0.0, 100.0)
}
