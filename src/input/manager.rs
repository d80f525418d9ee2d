//! Input manager for candidate and job files

use crate::error::{MatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::profile::{CandidateProfile, JobInput};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Candidate profile from a JSON file
    pub async fn load_candidate(&mut self, path: &Path) -> Result<CandidateProfile> {
        match FileType::from_path(path)? {
            FileType::Json => {
                let content = self.read(path, FileType::Json).await?;
                let candidate: CandidateProfile = serde_json::from_str(&content)?;
                info!("Loaded candidate profile: {}", candidate.display_name());
                Ok(candidate)
            }
            _ => Err(MatcherError::UnsupportedFormat(format!(
                "Candidate profiles must be JSON: {}",
                path.display()
            ))),
        }
    }

    /// Structured requirement from JSON, or raw posting text from TXT/MD
    pub async fn load_job(&mut self, path: &Path) -> Result<JobInput> {
        match FileType::from_path(path)? {
            FileType::Json => {
                let content = self.read(path, FileType::Json).await?;
                JobInput::from_json(&content)
            }
            FileType::Text | FileType::Markdown => {
                let text = self.extract_text(path).await?;
                if text.trim().is_empty() {
                    return Err(MatcherError::InvalidInput(format!(
                        "Job description is empty: {}",
                        path.display()
                    )));
                }
                Ok(JobInput::Raw(text))
            }
            FileType::Unknown => Err(MatcherError::UnsupportedFormat(format!(
                "Unsupported job file type: {}",
                path.display()
            ))),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let file_type = FileType::from_path(path)?;
        self.read(path, file_type).await
    }

    async fn read(&mut self, path: &Path, file_type: FileType) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match file_type {
            FileType::Json | FileType::Text => {
                info!("Reading file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(MatcherError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
