//! Prompt template for the narrative match analysis

use crate::llm::PromptVars;
use crate::retrieval::RetrievedFragment;

pub const JOB_CHUNKS_VAR: &str = "job_chunks";
pub const CANDIDATE_PROFILE_VAR: &str = "candidate_profile";

#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::match_analysis()
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn match_analysis() -> Self {
        Self::new(MATCH_ANALYSIS_TEMPLATE)
    }

    /// Substitute `{name}` placeholders in one pass over the template.
    /// Unknown placeholders are left as-is and substituted values are never rescanned.
    pub fn render(&self, vars: &PromptVars) -> String {
        let mut prompt = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            prompt.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}').and_then(|close| vars.get(&after[..close]).map(|v| (close, v))) {
                Some((close, value)) => {
                    prompt.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    prompt.push('{');
                    rest = after;
                }
            }
        }
        prompt.push_str(rest);
        prompt
    }
}

/// Variables for the match analysis template
pub fn match_analysis_vars(fragments: &[RetrievedFragment], candidate_profile: &str) -> PromptVars {
    let mut vars = PromptVars::new();
    vars.insert(JOB_CHUNKS_VAR.to_string(), format_fragments(fragments));
    vars.insert(CANDIDATE_PROFILE_VAR.to_string(), candidate_profile.to_string());
    vars
}

pub fn format_fragments(fragments: &[RetrievedFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| {
            if fragment.fallback {
                format!("Full JD Fallback:\n{}", fragment.text)
            } else {
                format!("Chunk {}:\n{}", fragment.source_rank + 1, fragment.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

const MATCH_ANALYSIS_TEMPLATE: &str = r#"You are an expert HR analyst. Analyze the match between the candidate's profile and the job requirements.
Use the retrieved job description chunks and candidate profile to provide a detailed analysis.

Retrieved Job Description Chunks:
{job_chunks}

Candidate Profile:
{candidate_profile}

Respond with JSON only, in exactly this shape:
{
    "match_score": 0-100,
    "strengths": [
        {
            "category": "skills/experience/education",
            "description": "detailed explanation",
            "relevance": "how this matches job requirements"
        }
    ],
    "gaps": [
        {
            "category": "skills/experience/education",
            "description": "what's missing",
            "importance": "how critical this is for the role"
        }
    ],
    "detailed_analysis": "comprehensive analysis of the match",
    "recommendation": "whether to shortlist, interview, or reject"
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, rank: usize, fallback: bool) -> RetrievedFragment {
        RetrievedFragment {
            text: text.to_string(),
            source_rank: rank,
            fallback,
        }
    }

    #[test]
    fn test_render_substitutes_both_vars() {
        let vars = match_analysis_vars(
            &[fragment("Needs Rust", 0, false), fragment("Remote role", 1, false)],
            "Candidate Profile:\nName: Ada",
        );
        let prompt = PromptTemplate::default().render(&vars);

        assert!(prompt.contains("Chunk 1:\nNeeds Rust\n\nChunk 2:\nRemote role"));
        assert!(prompt.contains("Name: Ada"));
        assert!(!prompt.contains("{job_chunks}"));
        assert!(!prompt.contains("{candidate_profile}"));
        // JSON braces in the schema survive rendering
        assert!(prompt.contains("\"match_score\": 0-100"));
    }

    #[test]
    fn test_fallback_fragment_is_labelled() {
        let text = format_fragments(&[fragment("Entire posting", 0, true)]);
        assert_eq!(text, "Full JD Fallback:\nEntire posting");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let template = PromptTemplate::new("{a} and {b}");
        let mut vars = PromptVars::new();
        vars.insert("a".to_string(), "x".to_string());
        assert_eq!(template.render(&vars), "x and {b}");
    }

    #[test]
    fn test_placeholder_text_inside_values_is_not_expanded() {
        let vars = match_analysis_vars(
            &[fragment("Needs Rust", 0, false)],
            "Candidate Profile:\nAdditional Information: I like {job_chunks}",
        );
        let prompt = PromptTemplate::default().render(&vars);

        assert!(prompt.contains("Additional Information: I like {job_chunks}"));
        assert_eq!(prompt.matches("Chunk 1:\nNeeds Rust").count(), 1);
    }

    #[test]
    fn test_unclosed_brace_is_copied() {
        let template = PromptTemplate::new("{a} {unterminated");
        let mut vars = PromptVars::new();
        vars.insert("a".to_string(), "x".to_string());
        assert_eq!(template.render(&vars), "x {unterminated");
    }
}
