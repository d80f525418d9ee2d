//! Candidate matcher library
//!
//! Evaluates how well a [`CandidateProfile`] matches a job, combining
//! heuristic attribute scores, embedding retrieval over the job description
//! and a generative model's narrative analysis into one [`ScoreBreakdown`].
//! Collaborators (embedder, vector index, text generator) are injected as
//! trait objects, so [`MatchEngine::evaluate`] can run against fakes.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod profile;
pub mod retrieval;
pub mod scoring;

pub use config::Config;
pub use engine::{AggregationPolicy, MatchEngine, Recommendation, ScoreBreakdown};
pub use error::{MatcherError, Result};
pub use profile::{CandidateProfile, JobInput, JobRequirement};
