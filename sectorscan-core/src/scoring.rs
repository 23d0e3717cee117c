//! Composite scorer: weighted sum of category scores and a stable
//! descending ranking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Category, CategoryScores};
use crate::numeric::round_to;

/// Allowed distance of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("category weights must sum to 1.0, got {sum}")]
    WeightsDoNotSumToOne { sum: f64 },

    #[error("weight for '{category}' must be a finite non-negative number, got {weight}")]
    InvalidWeight { category: Category, weight: f64 },
}

/// Per-category weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub trend: f64,
    pub momentum: f64,
    pub value: f64,
    pub fundamental: f64,
    pub risk_control: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            trend: 0.35,
            momentum: 0.25,
            value: 0.20,
            fundamental: 0.15,
            risk_control: 0.05,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Trend => self.trend,
            Category::Momentum => self.momentum,
            Category::Value => self.value,
            Category::Fundamental => self.fundamental,
            Category::RiskControl => self.risk_control,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }

    /// Reject negative or non-finite weights and sets not summing to 1.0.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for category in Category::ALL {
            let weight = self.get(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeight { category, weight });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::WeightsDoNotSumToOne { sum });
        }
        Ok(())
    }

    /// Weighted total rounded to 2 decimals.
    pub fn composite(&self, scores: &CategoryScores) -> f64 {
        let total: f64 = Category::ALL
            .iter()
            .map(|&c| self.get(c) * scores.get(c))
            .sum();
        round_to(total, 2)
    }
}

/// An item with its category scores and composite total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub item: T,
    pub categories: CategoryScores,
    pub total_score: f64,
}

/// Score every row and sort descending by total.
///
/// The sort is stable: rows with equal totals keep their input order.
pub fn rank<T>(rows: Vec<(T, CategoryScores)>, weights: &CategoryWeights) -> Vec<Ranked<T>> {
    let mut ranked: Vec<Ranked<T>> = rows
        .into_iter()
        .map(|(item, categories)| Ranked {
            total_score: weights.composite(&categories),
            item,
            categories,
        })
        .collect();
    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NEUTRAL_SCORE;

    #[test]
    fn default_weights_sum_to_one() {
        let w = CategoryWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert_eq!(w.validate(), Ok(()));
    }

    #[test]
    fn weights_off_by_a_bit_are_rejected() {
        let w = CategoryWeights {
            risk_control: 0.06,
            ..Default::default()
        };
        assert!(matches!(
            w.validate(),
            Err(ScoringError::WeightsDoNotSumToOne { .. })
        ));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let w = CategoryWeights {
            trend: 0.45,
            risk_control: -0.05,
            ..Default::default()
        };
        assert_eq!(
            w.validate(),
            Err(ScoringError::InvalidWeight {
                category: Category::RiskControl,
                weight: -0.05
            })
        );
    }

    #[test]
    fn composite_of_worked_example() {
        let w = CategoryWeights::default();
        let a = CategoryScores::new(85.0, 80.0, 60.0, 70.0, 65.0);
        assert_eq!(w.composite(&a), 75.5);
    }

    #[test]
    fn absent_categories_count_as_neutral() {
        let w = CategoryWeights::default();
        let only_trend = CategoryScores::default().with(Category::Trend, 100.0);
        // 0.35 * 100 + 0.65 * 50
        assert_eq!(w.composite(&only_trend), 67.5);
        assert_eq!(w.composite(&CategoryScores::default()), NEUTRAL_SCORE);
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let rows = vec![
            ("A", CategoryScores::uniform(76.5)),
            ("B", CategoryScores::uniform(76.5)),
            ("C", CategoryScores::uniform(90.0)),
        ];
        let ranked = rank(rows, &CategoryWeights::default());
        let order: Vec<&str> = ranked.iter().map(|r| r.item).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(ranked[0].total_score, 90.0);
        assert_eq!(ranked[1].total_score, 76.5);
    }

    #[test]
    fn rank_empty() {
        let ranked: Vec<Ranked<()>> = rank(vec![], &CategoryWeights::default());
        assert!(ranked.is_empty());
    }
}
