//! Chat completion client for OpenAI-compatible endpoints

use crate::config::LlmConfig;
use crate::error::{MatcherError, Result};
use crate::llm::{PromptTemplate, PromptVars, TextGenerator};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Renders the prompt template and sends it as a single user message.
///
/// Uses a blocking HTTP client; build and call it off any async runtime thread.
pub struct ChatCompletionGenerator {
    http_client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    api_key_env: String,
    template: PromptTemplate,
}

impl ChatCompletionGenerator {
    pub fn new(config: &LlmConfig, template: PromptTemplate) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .user_agent(concat!("candidate-matcher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        info!("Using chat model {} at {}", config.model, config.endpoint);

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
            api_key_env: config.api_key_env.clone(),
            template,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

impl TextGenerator for ChatCompletionGenerator {
    fn complete(&self, prompt_vars: &PromptVars) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            MatcherError::Generation(format!("environment variable {} is not set", self.api_key_env))
        })?;

        let prompt = self.template.render(prompt_vars);
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        debug!("Sending {} character prompt to {}", prompt.len(), self.completions_url());

        let response: ChatResponse = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MatcherError::Generation("response contained no message content".to_string()))
    }
}
