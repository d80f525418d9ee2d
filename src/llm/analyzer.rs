//! Narrative match analysis and coercion of raw model output

use crate::llm::prompts::match_analysis_vars;
use crate::llm::TextGenerator;
use crate::retrieval::RetrievedFragment;
use crate::scoring::clamp_score;
use crate::scoring::findings::{lenient_text, Gap, Strength};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Structured analysis returned by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeAnalysis {
    #[serde(deserialize_with = "lenient_score")]
    pub match_score: f64,
    #[serde(deserialize_with = "lenient_findings")]
    pub strengths: Vec<Strength>,
    #[serde(deserialize_with = "lenient_findings")]
    pub gaps: Vec<Gap>,
    #[serde(deserialize_with = "lenient_text")]
    pub detailed_analysis: String,
    #[serde(deserialize_with = "lenient_text")]
    pub recommendation: String,
}

/// Why the narrative stage could not produce a structured analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum NarrativeFailure {
    /// The model answered, but not with a JSON object
    UnparseableOutput(String),
    /// The model could not be reached or was disabled
    ServiceUnavailable(String),
}

impl fmt::Display for NarrativeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeFailure::UnparseableOutput(msg) => {
                write!(f, "Failed to parse model response as JSON: {}", msg)
            }
            NarrativeFailure::ServiceUnavailable(msg) => write!(f, "Model service unavailable: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedNarrative {
    /// Raw model text when there was one
    pub detailed_analysis: String,
    pub failure: NarrativeFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrativeOutcome {
    Parsed(NarrativeAnalysis),
    Degraded(DegradedNarrative),
}

impl NarrativeOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        NarrativeOutcome::Degraded(DegradedNarrative {
            detailed_analysis: String::new(),
            failure: NarrativeFailure::ServiceUnavailable(reason.into()),
        })
    }

    /// Coerce raw model text into an outcome. Only a JSON object is accepted.
    pub fn from_response(raw: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(raw.trim())
            .map_err(|e| e.to_string())
            .and_then(|value| {
                if value.is_object() {
                    serde_json::from_value::<NarrativeAnalysis>(value).map_err(|e| e.to_string())
                } else {
                    Err("expected a JSON object".to_string())
                }
            });

        match parsed {
            Ok(mut analysis) => {
                analysis.match_score = clamp_score(analysis.match_score);
                NarrativeOutcome::Parsed(analysis)
            }
            Err(reason) => NarrativeOutcome::Degraded(DegradedNarrative {
                detailed_analysis: raw.to_string(),
                failure: NarrativeFailure::UnparseableOutput(reason),
            }),
        }
    }

    /// Score in 0..=100 contributed by the narrative stage; 0 when degraded
    pub fn llm_score(&self) -> f64 {
        match self {
            NarrativeOutcome::Parsed(analysis) => clamp_score(analysis.match_score),
            NarrativeOutcome::Degraded(_) => 0.0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, NarrativeOutcome::Degraded(_))
    }

    pub fn failure(&self) -> Option<&NarrativeFailure> {
        match self {
            NarrativeOutcome::Parsed(_) => None,
            NarrativeOutcome::Degraded(degraded) => Some(&degraded.failure),
        }
    }

    pub fn detailed_analysis(&self) -> &str {
        match self {
            NarrativeOutcome::Parsed(analysis) => &analysis.detailed_analysis,
            NarrativeOutcome::Degraded(degraded) => &degraded.detailed_analysis,
        }
    }
}

/// Runs the match analysis prompt through a generator
pub struct NarrativeAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl NarrativeAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails; service and parse problems come back as a degraded outcome
    pub fn analyze(&self, candidate_profile: &str, fragments: &[RetrievedFragment]) -> NarrativeOutcome {
        let vars = match_analysis_vars(fragments, candidate_profile);

        match self.generator.complete(&vars) {
            Ok(raw) => {
                debug!("Model returned {} characters", raw.len());
                let outcome = NarrativeOutcome::from_response(&raw);
                if let Some(failure) = outcome.failure() {
                    warn!("{}", failure);
                }
                outcome
            }
            Err(e) => {
                warn!("Narrative analysis failed: {}", e);
                NarrativeOutcome::unavailable(e.to_string())
            }
        }
    }
}

fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScoreRepr {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match ScoreRepr::deserialize(deserializer)? {
        ScoreRepr::Number(n) => n,
        ScoreRepr::Text(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        ScoreRepr::Other(_) => 0.0,
    })
}

/// Accepts finding objects or bare strings, which become the description.
/// Items that are neither are skipped; a non-array value yields no findings.
fn lenient_findings<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromDescription,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        other => {
            debug!("Ignoring non-array findings: {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(text) => Some(T::from_description(text)),
            serde_json::Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect())
}

trait FromDescription {
    fn from_description(description: String) -> Self;
}

impl FromDescription for Strength {
    fn from_description(description: String) -> Self {
        Strength {
            description,
            ..Default::default()
        }
    }
}

impl FromDescription for Gap {
    fn from_description(description: String) -> Self {
        Gap {
            description,
            ..Default::default()
        }
    }
}
