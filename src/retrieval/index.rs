//! In-process vector index over chunked job descriptions

use crate::error::{MatcherError, Result};
use crate::retrieval::{cosine_similarity, Embedder, IndexHit, VectorIndex};
use log::{debug, info};
use std::sync::Arc;

struct IndexedChunk {
    text: String,
    embedding: Vec<f32>,
}

/// Brute-force cosine index. Populated up front, read-only during evaluation.
pub struct InMemoryIndex {
    embedder: Arc<dyn Embedder>,
    chunks: Vec<IndexedChunk>,
}

impl InMemoryIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            chunks: Vec::new(),
        }
    }

    /// Chunk and embed a job description, returning the number of chunks added
    pub fn add_document(&mut self, text: &str, chunk_size: usize, overlap: usize) -> Result<usize> {
        let chunks = chunk_text(text, chunk_size, overlap)?;
        let added = chunks.len();

        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk)?;
            self.chunks.push(IndexedChunk {
                text: chunk,
                embedding,
            });
        }

        info!("Indexed {} job description chunks", added);
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl VectorIndex for InMemoryIndex {
    fn query(&self, text: &str, k: usize) -> Result<Vec<IndexHit>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text)?;
        let mut scored: Vec<(f64, &IndexedChunk)> = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            let score = cosine_similarity(&query_embedding, &chunk.embedding)
                .map_err(|e| MatcherError::Index(e.to_string()))?
                .unwrap_or(0.0);
            scored.push((score, chunk));
        }

        // Stable sort keeps insertion order between equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        debug!("Index query scored {} chunks", scored.len());

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, chunk)| IndexHit {
                text: chunk.text.clone(),
                score: Some(score as f32),
            })
            .collect())
    }
}

/// Split text into overlapping character windows, breaking at whitespace or
/// sentence punctuation where possible. Each window starts `overlap` characters
/// before the previous one ended, so every character lands in some chunk.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    if chunk_size <= overlap {
        return Err(MatcherError::InvalidInput(
            "Chunk size must be greater than overlap".to_string(),
        ));
    }

    let content_chars: Vec<char> = text.chars().collect();
    let total_length = content_chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total_length {
        let end = std::cmp::min(start + chunk_size, total_length);

        let mut actual_end = end;
        if end < total_length {
            // A break inside the overlap would stall the window; cut hard instead
            for i in (start + overlap..end).rev() {
                let c = content_chars[i];
                if c.is_whitespace() || c == '.' || c == '!' || c == '?' {
                    actual_end = i + 1;
                    break;
                }
            }
        }

        let chunk: String = content_chars[start..actual_end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end == total_length {
            break;
        }
        start = actual_end - overlap;
    }

    Ok(chunks)
}
