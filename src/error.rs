//! Error handling for the match evaluation engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Generative model error: {0}")]
    Generation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

/// Model2Vec reports load failures through anyhow
impl From<anyhow::Error> for MatcherError {
    fn from(err: anyhow::Error) -> Self {
        MatcherError::Embedding(err.to_string())
    }
}

/// Transport failures only ever come from the generative model client
impl From<reqwest::Error> for MatcherError {
    fn from(err: reqwest::Error) -> Self {
        MatcherError::Generation(err.to_string())
    }
}
