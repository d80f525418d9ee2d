//! Similarity scoring over retrieved fragments, with the fallback policy

use crate::error::{MatcherError, Result};
use crate::retrieval::{Embedder, RetrievedFragment, VectorIndex, RETRIEVAL_K};
use crate::scoring::clamp_score;
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalOutcome {
    /// Never empty: holds the fallback fragment when the index had nothing
    pub fragments: Vec<RetrievedFragment>,
    /// Average cosine similarity x 100, 0 when it could not be computed
    pub semantic_score: f64,
    pub used_fallback: bool,
    pub error: Option<String>,
}

pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Retrieve fragments for `query`; `fallback_text` stands in when there are none
    pub fn retrieve(&self, query: &str, fallback_text: &str) -> RetrievalOutcome {
        let mut error = None;

        let hits = match self.index.query(query, RETRIEVAL_K) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Vector index query failed: {}", e);
                error = Some(e.to_string());
                Vec::new()
            }
        };

        let fragments: Vec<RetrievedFragment> = hits
            .into_iter()
            .filter(|hit| !hit.text.trim().is_empty())
            .take(RETRIEVAL_K)
            .enumerate()
            .map(|(rank, hit)| RetrievedFragment {
                text: hit.text,
                source_rank: rank,
                fallback: false,
            })
            .collect();

        let semantic_score = match self.similarity(query, &fragments) {
            Ok(score) => score,
            Err(e) => {
                warn!("Semantic similarity failed, using 0: {}", e);
                error.get_or_insert_with(|| e.to_string());
                0.0
            }
        };

        if fragments.is_empty() {
            debug!("No fragments retrieved, falling back to the full job description");
            return RetrievalOutcome {
                fragments: vec![RetrievedFragment {
                    text: fallback_text.to_string(),
                    source_rank: 0,
                    fallback: true,
                }],
                semantic_score,
                used_fallback: true,
                error,
            };
        }

        RetrievalOutcome {
            fragments,
            semantic_score,
            used_fallback: false,
            error,
        }
    }

    fn similarity(&self, query: &str, fragments: &[RetrievedFragment]) -> Result<f64> {
        if fragments.is_empty() {
            return Ok(0.0);
        }

        let query_embedding = self.embedder.embed(query)?;
        let mut similarities = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            let fragment_embedding = self.embedder.embed(&fragment.text)?;
            match cosine_similarity(&query_embedding, &fragment_embedding)? {
                Some(similarity) => similarities.push(similarity),
                None => debug!("Skipping degenerate embedding for fragment {}", fragment.source_rank),
            }
        }

        if similarities.is_empty() {
            return Ok(0.0);
        }

        let average = similarities.iter().sum::<f64>() / similarities.len() as f64;
        Ok(clamp_score(average * 100.0))
    }
}

/// Cosine similarity, `None` when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<Option<f64>> {
    if a.len() != b.len() {
        return Err(MatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return Ok(None);
    }

    Ok(Some(dot_product / (norm_a * norm_b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::IndexHit;
    use std::collections::HashMap;

    struct TableEmbedder(HashMap<String, Vec<f32>>);

    impl Embedder for TableEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.0
                .get(text)
                .cloned()
                .ok_or_else(|| MatcherError::Embedding(format!("no vector for '{}'", text)))
        }
    }

    struct FixedIndex(Vec<&'static str>);

    impl VectorIndex for FixedIndex {
        fn query(&self, _text: &str, k: usize) -> Result<Vec<IndexHit>> {
            Ok(self.0.iter().take(k).map(|t| IndexHit::new(*t)).collect())
        }
    }

    struct BrokenIndex;

    impl VectorIndex for BrokenIndex {
        fn query(&self, _text: &str, _k: usize) -> Result<Vec<IndexHit>> {
            Err(MatcherError::Index("connection refused".to_string()))
        }
    }

    fn embedder(entries: &[(&str, Vec<f32>)]) -> Arc<dyn Embedder> {
        Arc::new(TableEmbedder(
            entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ))
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap(), Some(1.0));
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), Some(0.0));
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), None);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), None);
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_average_similarity_over_fragments() {
        let embedder = embedder(&[
            ("query", vec![1.0, 0.0]),
            ("same", vec![2.0, 0.0]),
            ("orthogonal", vec![0.0, 3.0]),
        ]);
        let retriever = SemanticRetriever::new(embedder, Arc::new(FixedIndex(vec!["same", "orthogonal"])));

        let outcome = retriever.retrieve("query", "full job");
        assert!((outcome.semantic_score - 50.0).abs() < 1e-9);
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.fragments.len(), 2);
        assert_eq!(outcome.fragments[1].source_rank, 1);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_only_top_k_fragments_are_used() {
        let embedder = embedder(&[
            ("query", vec![1.0, 0.0]),
            ("a", vec![1.0, 0.0]),
            ("b", vec![1.0, 0.0]),
            ("c", vec![1.0, 0.0]),
            ("d", vec![0.0, 1.0]),
        ]);
        struct GreedyIndex;
        impl VectorIndex for GreedyIndex {
            fn query(&self, _text: &str, _k: usize) -> Result<Vec<IndexHit>> {
                Ok(["a", "b", "c", "d"].iter().map(|t| IndexHit::new(*t)).collect())
            }
        }

        let outcome = SemanticRetriever::new(embedder, Arc::new(GreedyIndex)).retrieve("query", "job");
        assert_eq!(outcome.fragments.len(), RETRIEVAL_K);
        assert!((outcome.semantic_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_index_falls_back_to_job_text() {
        let retriever = SemanticRetriever::new(embedder(&[]), Arc::new(FixedIndex(vec![])));

        let outcome = retriever.retrieve("query", "Full job description");
        assert_eq!(outcome.semantic_score, 0.0);
        assert!(outcome.used_fallback);
        assert_eq!(outcome.fragments.len(), 1);
        assert!(outcome.fragments[0].fallback);
        assert_eq!(outcome.fragments[0].text, "Full job description");
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_index_failure_is_contained() {
        let retriever = SemanticRetriever::new(embedder(&[]), Arc::new(BrokenIndex));

        let outcome = retriever.retrieve("query", "job text");
        assert_eq!(outcome.semantic_score, 0.0);
        assert!(outcome.used_fallback);
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_embedding_failure_scores_zero_but_keeps_fragments() {
        let retriever = SemanticRetriever::new(embedder(&[]), Arc::new(FixedIndex(vec!["chunk"])));

        let outcome = retriever.retrieve("query", "job text");
        assert_eq!(outcome.semantic_score, 0.0);
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.fragments[0].text, "chunk");
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_degenerate_vectors_score_zero() {
        let embedder = embedder(&[("query", vec![0.0, 0.0]), ("chunk", vec![1.0, 1.0])]);
        let retriever = SemanticRetriever::new(embedder, Arc::new(FixedIndex(vec!["chunk"])));

        let outcome = retriever.retrieve("query", "job");
        assert_eq!(outcome.semantic_score, 0.0);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_negative_similarity_is_clamped() {
        let embedder = embedder(&[("query", vec![1.0, 0.0]), ("opposite", vec![-1.0, 0.0])]);
        let retriever = SemanticRetriever::new(embedder, Arc::new(FixedIndex(vec!["opposite"])));

        assert_eq!(retriever.retrieve("query", "job").semantic_score, 0.0);
    }
}
