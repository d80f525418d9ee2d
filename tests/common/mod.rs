//! Fake collaborators shared by the integration tests

#![allow(dead_code)]

use candidate_matcher::error::{MatcherError, Result};
use candidate_matcher::llm::{PromptVars, TextGenerator};
use candidate_matcher::retrieval::{Embedder, IndexHit, VectorIndex};
use std::sync::Mutex;

const VOCABULARY: &[&str] = &["python", "spark", "sql", "aws", "kafka", "airflow", "data", "pipelines"];

/// Bag-of-keywords embedding, deterministic and dependency free
pub struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCABULARY.iter().map(|word| lower.matches(word).count() as f32).collect())
    }
}

pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(MatcherError::Embedding("embedding service unreachable".to_string()))
    }
}

pub struct EmptyIndex;

impl VectorIndex for EmptyIndex {
    fn query(&self, _text: &str, _k: usize) -> Result<Vec<IndexHit>> {
        Ok(Vec::new())
    }
}

pub struct FailingIndex;

impl VectorIndex for FailingIndex {
    fn query(&self, _text: &str, _k: usize) -> Result<Vec<IndexHit>> {
        Err(MatcherError::Index("index connection reset".to_string()))
    }
}

/// Returns a canned response and records every prompt it was given
pub struct RecordingGenerator {
    response: String,
    pub prompts: Mutex<Vec<PromptVars>>,
}

impl RecordingGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> PromptVars {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl TextGenerator for RecordingGenerator {
    fn complete(&self, prompt_vars: &PromptVars) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt_vars.clone());
        Ok(self.response.clone())
    }
}

pub struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn complete(&self, _prompt_vars: &PromptVars) -> Result<String> {
        Err(MatcherError::Generation("request timed out".to_string()))
    }
}

pub const WELL_FORMED_ANALYSIS: &str = r#"{
    "match_score": 72,
    "strengths": [
        {"category": "skills", "description": "Production Spark and Python", "relevance": "Core of the role"}
    ],
    "gaps": [
        {"category": "skills", "description": "No Kafka experience", "importance": "High for streaming work"}
    ],
    "detailed_analysis": "Solid batch data engineer, lighter on streaming.",
    "recommendation": "interview"
}"#;
