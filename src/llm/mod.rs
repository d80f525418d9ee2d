//! Generative model integration

pub mod analyzer;
pub mod client;
pub mod prompts;

use crate::error::Result;
use std::collections::BTreeMap;

pub use analyzer::{DegradedNarrative, NarrativeAnalysis, NarrativeAnalyzer, NarrativeFailure, NarrativeOutcome};
pub use client::ChatCompletionGenerator;
pub use prompts::PromptTemplate;

/// Named values substituted into a prompt template
pub type PromptVars = BTreeMap<String, String>;

/// Generative model service. Each call is independent; no conversation state
/// is kept between calls. The output is raw text and may not be valid JSON.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt_vars: &PromptVars) -> Result<String>;
}
