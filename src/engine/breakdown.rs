//! Result record of one evaluation

use crate::engine::aggregator::{AggregationPolicy, Recommendation, SubScores, SHORTLIST_THRESHOLD};
use crate::retrieval::RetrievedFragment;
use crate::scoring::findings::{Gap, Strength};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Retrieval,
    Narrative,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Retrieval => "retrieval",
            Stage::Narrative => "narrative",
        };
        f.write_str(name)
    }
}

/// A contained collaborator failure. Its presence marks the breakdown as low confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub semantic_score: f64,
    pub llm_score: f64,
    pub final_score: f64,
    pub strengths: Vec<Strength>,
    pub gaps: Vec<Gap>,
    pub recommendation: Recommendation,
    pub policy: AggregationPolicy,
    pub detailed_analysis: String,
    /// Free-text recommendation from the model, empty when degraded
    pub model_recommendation: String,
    pub fragments: Vec<RetrievedFragment>,
    pub used_fallback_context: bool,
    pub errors: Vec<StageError>,
}

impl ScoreBreakdown {
    pub fn sub_scores(&self) -> SubScores {
        SubScores {
            skill: self.skill_score,
            experience: self.experience_score,
            education: self.education_score,
            semantic: self.semantic_score,
            llm: self.llm_score,
        }
    }

    /// Candidate qualifies for an interview invitation
    pub fn should_shortlist(&self) -> bool {
        self.final_score >= SHORTLIST_THRESHOLD
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_for(&self, stage: Stage) -> Option<&StageError> {
        self.errors.iter().find(|e| e.stage == stage)
    }
}
