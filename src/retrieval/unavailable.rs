//! Stand-ins for retrieval collaborators that could not be brought up

use crate::error::{MatcherError, Result};
use crate::retrieval::{Embedder, InMemoryIndex, IndexHit, VectorIndex};
use log::warn;
use std::sync::Arc;

/// Answers every call with the error captured at startup, so the
/// evaluation records a retrieval failure instead of aborting.
#[derive(Debug, Clone)]
pub struct UnavailableRetrieval {
    reason: String,
}

impl UnavailableRetrieval {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Embedder for UnavailableRetrieval {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(MatcherError::Embedding(format!("embedding model unavailable: {}", self.reason)))
    }
}

impl VectorIndex for UnavailableRetrieval {
    fn query(&self, _text: &str, _k: usize) -> Result<Vec<IndexHit>> {
        Err(MatcherError::Index(format!("job index unavailable: {}", self.reason)))
    }
}

/// Use the loaded embedder, or a stand-in carrying the load error
pub fn embedder_or_unavailable<E>(loaded: Result<E>) -> Arc<dyn Embedder>
where
    E: Embedder + 'static,
{
    match loaded {
        Ok(embedder) => Arc::new(embedder),
        Err(e) => {
            warn!("Embedding model could not be loaded, semantic scoring will degrade: {}", e);
            Arc::new(UnavailableRetrieval::new(e.to_string()))
        }
    }
}

/// Index a job description, or fall back to a stand-in carrying the indexing error
pub fn index_job_description(
    embedder: Arc<dyn Embedder>,
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Arc<dyn VectorIndex> {
    let mut index = InMemoryIndex::new(embedder);
    match index.add_document(text, chunk_size, overlap) {
        Ok(_) => Arc::new(index),
        Err(e) => {
            warn!("Job description could not be indexed, semantic scoring will degrade: {}", e);
            Arc::new(UnavailableRetrieval::new(e.to_string()))
        }
    }
}
