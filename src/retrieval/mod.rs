//! Semantic retrieval of job-description fragments

pub mod embeddings;
pub mod index;
pub mod semantic;
pub mod unavailable;

use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use embeddings::Model2VecEmbedder;
pub use index::{chunk_text, InMemoryIndex};
pub use semantic::{cosine_similarity, RetrievalOutcome, SemanticRetriever};
pub use unavailable::{embedder_or_unavailable, index_job_description, UnavailableRetrieval};

/// Number of fragments retrieved per query
pub const RETRIEVAL_K: usize = 3;

/// Text embedding service
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Read-only vector index over job-description fragments.
/// An empty or uninitialised index answers with no hits rather than an error.
pub trait VectorIndex: Send + Sync {
    fn query(&self, text: &str, k: usize) -> Result<Vec<IndexHit>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    pub text: String,
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedFragment {
    pub text: String,
    /// Position in the retrieval result, 0 = most relevant
    pub source_rank: usize,
    /// Set on the synthetic fragment carrying the full job text
    pub fallback: bool,
}

impl IndexHit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
        }
    }
}
