//! Match evaluation: attribute scoring, retrieval, narrative analysis and aggregation

pub mod aggregator;
pub mod breakdown;
pub mod evaluator;

pub use aggregator::{AggregationPolicy, Recommendation, ScoreWeights, SubScores};
pub use breakdown::{ScoreBreakdown, Stage, StageError};
pub use evaluator::MatchEngine;
