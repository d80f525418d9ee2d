//! Integration tests for the candidate matcher

mod common;

use candidate_matcher::engine::{AggregationPolicy, MatchEngine, Recommendation};
use candidate_matcher::input::InputManager;
use candidate_matcher::output::{EvaluationReport, ReportGenerator, ReportMetadata};
use candidate_matcher::config::OutputFormat;
use candidate_matcher::profile::JobInput;
use candidate_matcher::retrieval::InMemoryIndex;
use common::{KeywordEmbedder, RecordingGenerator, WELL_FORMED_ANALYSIS};
use std::path::Path;
use std::sync::Arc;

const SKILL_SCORE: f64 = 0.7 * (2.0 / 3.0) * 100.0 + 0.3 * 0.5 * 100.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[tokio::test]
async fn test_load_fixtures() {
    let mut manager = InputManager::new();

    let candidate = manager
        .load_candidate(Path::new("tests/fixtures/candidate.json"))
        .await
        .unwrap();
    assert_eq!(candidate.display_name(), "Jane Smith");
    assert_eq!(candidate.skills.len(), 4);
    assert_eq!(candidate.experience.len(), 2);

    match manager.load_job(Path::new("tests/fixtures/job.json")).await.unwrap() {
        JobInput::Structured(job) => {
            assert_eq!(job.job_title, "Senior Data Engineer");
            assert!(job.required_skills.contains("kafka"));
        }
        JobInput::Raw(_) => panic!("expected a structured job"),
    }
}

#[tokio::test]
async fn test_markdown_posting_keeps_structure() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/job_posting.md"))
        .await
        .unwrap();

    assert!(text.contains("Senior Data Engineer"));
    assert!(text.contains("- Own data quality for the analytics platform"));
    // Emphasis markers are stripped
    assert!(!text.contains("**"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/job_posting.md");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    assert!(manager.load_job(Path::new("tests/fixtures/unsupported.xyz")).await.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    assert!(manager.load_candidate(Path::new("tests/fixtures/nonexistent.json")).await.is_err());
}

#[tokio::test]
async fn test_markdown_posting_parses_like_structured_job() {
    let mut manager = InputManager::new();
    let raw = manager.load_job(Path::new("tests/fixtures/job_posting.md")).await.unwrap();
    let structured = manager.load_job(Path::new("tests/fixtures/job.json")).await.unwrap();

    let engine = MatchEngine::new(
        Arc::new(KeywordEmbedder),
        Arc::new(common::EmptyIndex),
        None,
        AggregationPolicy::Heuristic,
    )
    .unwrap();

    let parsed = engine.job_requirement(&raw);
    let expected = engine.job_requirement(&structured);
    assert_eq!(parsed.job_title, expected.job_title);
    assert_eq!(parsed.required_skills, expected.required_skills);
    assert_eq!(parsed.preferred_skills, expected.preferred_skills);
    assert!(parsed.experience_required.starts_with("5+ years"));
    assert!(parsed.education.starts_with("Bachelor's degree"));
    assert_eq!(parsed.responsibilities.len(), 2);
}

#[tokio::test]
async fn test_end_to_end_with_indexed_posting() {
    let mut manager = InputManager::new();
    let candidate = manager
        .load_candidate(Path::new("tests/fixtures/candidate.json"))
        .await
        .unwrap();
    let job = manager.load_job(Path::new("tests/fixtures/job_posting.md")).await.unwrap();

    let embedder = Arc::new(KeywordEmbedder);
    let mut index = InMemoryIndex::new(embedder.clone());
    let chunks = index.add_document(&job.description_text(), 200, 40).unwrap();
    assert!(chunks > 1);

    let generator = Arc::new(RecordingGenerator::new(WELL_FORMED_ANALYSIS));
    let engine = MatchEngine::new(
        embedder,
        Arc::new(index),
        Some(generator.clone()),
        AggregationPolicy::Heuristic,
    )
    .unwrap();

    let breakdown = engine.evaluate(&candidate, &job);

    assert!((breakdown.skill_score - SKILL_SCORE).abs() < 1e-9);
    assert_eq!(breakdown.experience_score, 80.0);
    assert_eq!(breakdown.education_score, 100.0);
    assert_eq!(breakdown.llm_score, 72.0);
    assert!(breakdown.semantic_score > 0.0 && breakdown.semantic_score <= 100.0);
    assert_eq!(
        breakdown.final_score,
        round2(0.4 * breakdown.skill_score + 0.3 * 80.0 + 0.2 * 100.0 + 0.1 * breakdown.semantic_score)
    );
    assert!(breakdown.errors.is_empty());
    assert!(!breakdown.used_fallback_context);
    assert!(breakdown.fragments.len() <= 3);
    assert_eq!(breakdown.strengths[0].description, "Production Spark and Python");
    assert_eq!(breakdown.model_recommendation, "interview");

    assert_eq!(generator.calls(), 1);
    let prompt = generator.last_prompt();
    assert!(prompt["job_chunks"].starts_with("Chunk 1:\n"));
    assert!(prompt["candidate_profile"].contains("Name: Jane Smith"));
    assert!(prompt["candidate_profile"].contains("Data Engineer at Acme Analytics (4 years)"));

    let report = EvaluationReport::new(
        breakdown.clone(),
        ReportMetadata::new(candidate.display_name(), engine.job_requirement(&job).job_title),
    );
    let markdown = ReportGenerator::with_options(false, true, true, false)
        .generate_report(&report, &OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.starts_with("# Match Evaluation: Jane Smith"));
    assert!(markdown.contains("**Position:** Senior Data Engineer"));
    assert!(markdown.contains("## Job Context"));
}

#[tokio::test]
async fn test_narrative_policy_on_fixtures() {
    let mut manager = InputManager::new();
    let candidate = manager
        .load_candidate(Path::new("tests/fixtures/candidate.json"))
        .await
        .unwrap();
    let job = manager.load_job(Path::new("tests/fixtures/job.json")).await.unwrap();

    let embedder = Arc::new(KeywordEmbedder);
    let mut index = InMemoryIndex::new(embedder.clone());
    index.add_document(&job.description_text(), 1000, 200).unwrap();

    let engine = MatchEngine::new(
        embedder,
        Arc::new(index),
        Some(Arc::new(RecordingGenerator::new(WELL_FORMED_ANALYSIS))),
        AggregationPolicy::Narrative,
    )
    .unwrap();
    let breakdown = engine.evaluate(&candidate, &job);

    assert_eq!(breakdown.policy, AggregationPolicy::Narrative);
    assert_eq!(
        breakdown.final_score,
        round2(0.7 * breakdown.semantic_score + 0.3 * 72.0)
    );
    assert_eq!(breakdown.recommendation, Recommendation::from_score(breakdown.final_score));
    // Heuristic sub-scores are still reported for auditability
    assert_eq!(breakdown.experience_score, 80.0);
}
