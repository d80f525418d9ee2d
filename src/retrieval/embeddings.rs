//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::Result;
use crate::retrieval::Embedder;
use log::info;
use model2vec_rs::model::StaticModel;
use std::time::Instant;

/// Static Model2Vec embedding model, loaded once and shared across evaluations
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a HuggingFace repo id or a local model folder
    pub fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model: {}", repo_or_path);

        let model = StaticModel::from_pretrained(repo_or_path, None, None, None)?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());
        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::load(&config.models.embedding_model)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }
}
