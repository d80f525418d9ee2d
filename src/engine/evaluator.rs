//! The `evaluate` entry point

use crate::engine::aggregator::{AggregationPolicy, Recommendation, SubScores};
use crate::engine::breakdown::{ScoreBreakdown, Stage, StageError};
use crate::error::Result;
use crate::llm::{NarrativeAnalyzer, NarrativeOutcome, TextGenerator};
use crate::profile::{CandidateProfile, JobDescriptionParser, JobInput, JobRequirement};
use crate::retrieval::{Embedder, SemanticRetriever, VectorIndex};
use crate::scoring::findings::heuristic_findings;
use crate::scoring::AttributeScorer;
use log::{debug, info, warn};
use std::sync::Arc;

/// Holds only shared read-only collaborators, so one engine can serve
/// concurrent evaluations from several threads.
pub struct MatchEngine {
    scorer: AttributeScorer,
    retriever: SemanticRetriever,
    narrative: Option<NarrativeAnalyzer>,
    job_parser: JobDescriptionParser,
    policy: AggregationPolicy,
}

impl MatchEngine {
    /// `generator` may be `None` to skip the narrative stage; its score then
    /// falls back to 0 and the breakdown carries a narrative error.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Option<Arc<dyn TextGenerator>>,
        policy: AggregationPolicy,
    ) -> Result<Self> {
        Ok(Self {
            scorer: AttributeScorer,
            retriever: SemanticRetriever::new(embedder, index),
            narrative: generator.map(NarrativeAnalyzer::new),
            job_parser: JobDescriptionParser::new()?,
            policy,
        })
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Structured view of the job as the engine scores it
    pub fn job_requirement(&self, job: &JobInput) -> JobRequirement {
        job.requirement(&self.job_parser)
    }

    /// Evaluate one candidate against one job. Never fails: collaborator
    /// errors are contained and reported in `ScoreBreakdown::errors`.
    pub fn evaluate(&self, candidate: &CandidateProfile, job: &JobInput) -> ScoreBreakdown {
        let requirement = self.job_requirement(job);
        let job_text = job.description_text();
        let mut errors = Vec::new();

        let attributes = self.scorer.score(candidate, &requirement);
        debug!(
            "Attribute scores: skill={:.2} experience={:.2} education={:.2}",
            attributes.skill, attributes.experience, attributes.education
        );

        let profile_text = candidate.to_profile_text();
        let retrieval = self.retriever.retrieve(&profile_text, &job_text);
        if let Some(message) = retrieval.error.clone() {
            errors.push(StageError {
                stage: Stage::Retrieval,
                message,
            });
        }
        if retrieval.used_fallback {
            debug!("Narrative stage receives the full job description as context");
        }

        let narrative = match &self.narrative {
            Some(analyzer) => analyzer.analyze(&profile_text, &retrieval.fragments),
            None => NarrativeOutcome::unavailable("narrative analysis disabled"),
        };
        if let Some(failure) = narrative.failure() {
            errors.push(StageError {
                stage: Stage::Narrative,
                message: failure.to_string(),
            });
        }

        let scores = SubScores {
            skill: attributes.skill,
            experience: attributes.experience,
            education: attributes.education,
            semantic: retrieval.semantic_score,
            llm: narrative.llm_score(),
        };
        let final_score = self.policy.aggregate(&scores);
        let recommendation = Recommendation::from_score(final_score);

        let (strengths, gaps, detailed_analysis, model_recommendation) = match narrative {
            NarrativeOutcome::Parsed(analysis) => {
                let (strengths, gaps) = if analysis.strengths.is_empty() && analysis.gaps.is_empty() {
                    heuristic_findings(candidate, &requirement)
                } else {
                    (analysis.strengths, analysis.gaps)
                };
                (strengths, gaps, analysis.detailed_analysis, analysis.recommendation)
            }
            NarrativeOutcome::Degraded(degraded) => {
                let (strengths, gaps) = heuristic_findings(candidate, &requirement);
                let detailed_analysis = if degraded.detailed_analysis.is_empty() {
                    degraded.failure.to_string()
                } else {
                    degraded.detailed_analysis
                };
                (strengths, gaps, detailed_analysis, String::new())
            }
        };

        if errors.is_empty() {
            info!(
                "Evaluated {}: final score {:.2} ({}, {} policy)",
                candidate.display_name(),
                final_score,
                recommendation,
                self.policy
            );
        } else {
            warn!(
                "Evaluated {} with {} degraded stage(s): final score {:.2} ({}, {} policy)",
                candidate.display_name(),
                errors.len(),
                final_score,
                recommendation,
                self.policy
            );
        }

        ScoreBreakdown {
            skill_score: scores.skill,
            experience_score: scores.experience,
            education_score: scores.education,
            semantic_score: scores.semantic,
            llm_score: scores.llm,
            final_score,
            strengths,
            gaps,
            recommendation,
            policy: self.policy,
            detailed_analysis,
            model_recommendation,
            fragments: retrieval.fragments,
            used_fallback_context: retrieval.used_fallback,
            errors,
        }
    }
}
