//! Deterministic heuristic sub-scores over structured attributes

pub mod education;
pub mod experience;
pub mod findings;
pub mod skills;

use crate::profile::{CandidateProfile, JobRequirement};
use serde::{Deserialize, Serialize};

pub use education::education_match_score;
pub use experience::experience_match_score;
pub use skills::skill_match_score;

/// Heuristic sub-scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeScores {
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
}

/// Pure scorer, no I/O
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeScorer;

impl AttributeScorer {
    pub fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> AttributeScores {
        AttributeScores {
            skill: skill_match_score(&candidate.skills, &job.required_skills, &job.preferred_skills),
            experience: experience_match_score(&candidate.experience, &job.experience_required),
            education: education_match_score(&candidate.education, &job.education),
        }
    }
}

/// Clamp into [0, 100], mapping NaN to 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
