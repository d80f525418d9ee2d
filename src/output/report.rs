//! Evaluation report: a score breakdown plus the context it was produced in

use crate::engine::ScoreBreakdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metadata: ReportMetadata,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    pub candidate_name: String,
    pub job_title: String,
    pub candidate_file: Option<String>,
    pub job_file: Option<String>,
    pub embedding_model: Option<String>,
    /// `None` when narrative analysis was disabled
    pub llm_model: Option<String>,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(candidate_name: impl Into<String>, job_title: impl Into<String>) -> Self {
        let job_title = job_title.into();
        Self {
            generated_at: Utc::now(),
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
            candidate_name: candidate_name.into(),
            job_title: if job_title.trim().is_empty() {
                "Untitled position".to_string()
            } else {
                job_title
            },
            candidate_file: None,
            job_file: None,
            embedding_model: None,
            llm_model: None,
            processing_time_ms: 0,
        }
    }

    pub fn with_files(mut self, candidate_file: impl Into<String>, job_file: impl Into<String>) -> Self {
        self.candidate_file = Some(candidate_file.into());
        self.job_file = Some(job_file.into());
        self
    }

    pub fn with_models(mut self, embedding_model: impl Into<String>, llm_model: Option<String>) -> Self {
        self.embedding_model = Some(embedding_model.into());
        self.llm_model = llm_model;
        self
    }

    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }
}

impl EvaluationReport {
    pub fn new(breakdown: ScoreBreakdown, metadata: ReportMetadata) -> Self {
        Self { metadata, breakdown }
    }

    /// One-line verdict combining the band and the confidence of the result
    pub fn verdict(&self) -> String {
        let summary = self.breakdown.recommendation.summary();
        if self.breakdown.is_degraded() {
            format!("{} (low confidence: {} stage(s) degraded)", summary, self.breakdown.errors.len())
        } else {
            summary.to_string()
        }
    }
}
