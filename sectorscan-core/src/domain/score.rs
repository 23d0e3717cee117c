//! Category scores: the five normalized factor families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score assigned to a category when none of its inputs are available.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Factor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trend,
    Momentum,
    Value,
    Fundamental,
    RiskControl,
}

impl Category {
    /// All categories in weighting order.
    pub const ALL: [Category; 5] = [
        Category::Trend,
        Category::Momentum,
        Category::Value,
        Category::Fundamental,
        Category::RiskControl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trend => "trend",
            Category::Momentum => "momentum",
            Category::Value => "value",
            Category::Fundamental => "fundamental",
            Category::RiskControl => "risk_control",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores in [0, 100] for each category of one candidate.
///
/// `Default` is neutral (50.0 everywhere), so a partially filled set treats
/// every absent category as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub trend: f64,
    pub momentum: f64,
    pub value: f64,
    pub fundamental: f64,
    pub risk_control: f64,
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self::uniform(NEUTRAL_SCORE)
    }
}

impl CategoryScores {
    pub fn new(trend: f64, momentum: f64, value: f64, fundamental: f64, risk_control: f64) -> Self {
        Self {
            trend,
            momentum,
            value,
            fundamental,
            risk_control,
        }
    }

    /// Same score in every category.
    pub fn uniform(score: f64) -> Self {
        Self::new(score, score, score, score, score)
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Trend => self.trend,
            Category::Momentum => self.momentum,
            Category::Value => self.value,
            Category::Fundamental => self.fundamental,
            Category::RiskControl => self.risk_control,
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, category: Category, score: f64) -> Self {
        match category {
            Category::Trend => self.trend = score,
            Category::Momentum => self.momentum = score,
            Category::Value => self.value = score,
            Category::Fundamental => self.fundamental = score,
            Category::RiskControl => self.risk_control = score,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        let s = CategoryScores::default();
        for c in Category::ALL {
            assert_eq!(s.get(c), NEUTRAL_SCORE);
        }
    }

    #[test]
    fn with_sets_only_one_category() {
        let s = CategoryScores::default().with(Category::Value, 90.0);
        assert_eq!(s.value, 90.0);
        assert_eq!(s.trend, NEUTRAL_SCORE);
        assert_eq!(s.risk_control, NEUTRAL_SCORE);
    }

    #[test]
    fn category_names_are_snake_case() {
        assert_eq!(Category::RiskControl.to_string(), "risk_control");
        assert_eq!(
            serde_json::to_string(&Category::RiskControl).unwrap(),
            "\"risk_control\""
        );
    }
}
