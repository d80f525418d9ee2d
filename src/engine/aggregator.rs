//! Fixed-weight aggregation of sub-scores into the final score

use crate::error::MatcherError;
use crate::scoring::clamp_score;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SHORTLIST_THRESHOLD: f64 = 80.0;
pub const REVIEW_THRESHOLD: f64 = 60.0;

/// Which signals feed the final score. One policy per engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// 0.4 skill + 0.3 experience + 0.2 education + 0.1 semantic
    #[default]
    Heuristic,
    /// 0.7 semantic + 0.3 model score
    Narrative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
    pub llm: f64,
}

const HEURISTIC_WEIGHTS: ScoreWeights = ScoreWeights {
    skill: 0.4,
    experience: 0.3,
    education: 0.2,
    semantic: 0.1,
    llm: 0.0,
};

const NARRATIVE_WEIGHTS: ScoreWeights = ScoreWeights {
    skill: 0.0,
    experience: 0.0,
    education: 0.0,
    semantic: 0.7,
    llm: 0.3,
};

/// All five sub-scores of one evaluation. Indeterminate values are already
/// replaced by their neutral defaults by the time they land here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
    pub llm: f64,
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.skill + self.experience + self.education + self.semantic + self.llm
    }
}

impl AggregationPolicy {
    pub fn weights(&self) -> ScoreWeights {
        match self {
            AggregationPolicy::Heuristic => HEURISTIC_WEIGHTS,
            AggregationPolicy::Narrative => NARRATIVE_WEIGHTS,
        }
    }

    /// Weighted sum of the clamped sub-scores, rounded to 2 decimals
    pub fn aggregate(&self, scores: &SubScores) -> f64 {
        let w = self.weights();
        let sum = w.skill * clamp_score(scores.skill)
            + w.experience * clamp_score(scores.experience)
            + w.education * clamp_score(scores.education)
            + w.semantic * clamp_score(scores.semantic)
            + w.llm * clamp_score(scores.llm);
        round2(clamp_score(sum))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationPolicy::Heuristic => "heuristic",
            AggregationPolicy::Narrative => "narrative",
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationPolicy {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(AggregationPolicy::Heuristic),
            "narrative" => Ok(AggregationPolicy::Narrative),
            other => Err(MatcherError::InvalidInput(format!(
                "Invalid aggregation policy: {}. Supported: heuristic, narrative",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Shortlist,
    Review,
    Reject,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= SHORTLIST_THRESHOLD {
            Recommendation::Shortlist
        } else if score >= REVIEW_THRESHOLD {
            Recommendation::Review
        } else {
            Recommendation::Reject
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Shortlist => "shortlist",
            Recommendation::Review => "review",
            Recommendation::Reject => "reject",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Recommendation::Shortlist => "Strong match, shortlist for interview",
            Recommendation::Review => "Partial match, needs manual review",
            Recommendation::Reject => "Weak match, not recommended",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
