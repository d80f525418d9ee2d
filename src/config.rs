//! Configuration management for the match evaluation engine

use crate::engine::aggregator::AggregationPolicy;
use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub retrieval: RetrievalConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// HuggingFace repo id or local folder of a Model2Vec model
    pub embedding_model: String,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub policy: AggregationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig {
                embedding_model: "minishlab/potion-base-8M".to_string(),
                llm: LlmConfig {
                    endpoint: "https://api.groq.com/openai/v1".to_string(),
                    model: "openai/gpt-oss-20b".to_string(),
                    api_key_env: "GROQ_API_KEY".to_string(),
                    temperature: 0.3,
                    timeout_secs: 60,
                },
            },
            retrieval: RetrievalConfig {
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            scoring: ScoringConfig {
                policy: AggregationPolicy::default(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.chunk_size <= self.retrieval.chunk_overlap {
            return Err(MatcherError::Configuration(format!(
                "retrieval.chunk_size ({}) must be greater than retrieval.chunk_overlap ({})",
                self.retrieval.chunk_size, self.retrieval.chunk_overlap
            )));
        }
        if self.models.llm.endpoint.trim().is_empty() {
            return Err(MatcherError::Configuration(
                "models.llm.endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
