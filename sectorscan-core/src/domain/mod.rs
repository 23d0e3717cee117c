//! Domain types for SectorScan

pub mod candidate;
pub mod factors;
pub mod plan;
pub mod price;
pub mod score;

pub use candidate::{Candidate, CandidateData, Market, Valuation};
pub use factors::RawFactorSet;
pub use plan::{PositionPlan, SHARE_FORMULA};
pub use price::{closes, PricePoint};
pub use score::{Category, CategoryScores, NEUTRAL_SCORE};
