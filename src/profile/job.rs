//! Job requirement records, structured or raw

use crate::error::Result;
use crate::profile::job_parser::JobDescriptionParser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirement {
    pub job_title: String,
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    /// Free text, may start with a year count ("5+ years of ...")
    pub experience_required: String,
    pub education: String,
    pub responsibilities: Vec<String>,
}

/// What the caller hands to the engine for the job side of an evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum JobInput {
    Structured(JobRequirement),
    Raw(String),
}

impl JobRequirement {
    /// Reconstruct a requirement from raw posting text with the default skill vocabulary
    pub fn from_description(text: &str) -> Result<Self> {
        Ok(JobDescriptionParser::new()?.parse(text))
    }

    /// Render the requirement as plain description text
    pub fn to_description_text(&self) -> String {
        let mut text = String::new();
        if !self.job_title.trim().is_empty() {
            text.push_str(&format!("Job Title: {}\n", self.job_title.trim()));
        }
        if !self.required_skills.is_empty() {
            text.push_str(&format!("Required Skills: {}\n", join(&self.required_skills)));
        }
        if !self.preferred_skills.is_empty() {
            text.push_str(&format!("Preferred Skills: {}\n", join(&self.preferred_skills)));
        }
        if !self.experience_required.trim().is_empty() {
            text.push_str(&format!("Experience Required: {}\n", self.experience_required.trim()));
        }
        if !self.education.trim().is_empty() {
            text.push_str(&format!("Education: {}\n", self.education.trim()));
        }
        if !self.responsibilities.is_empty() {
            text.push_str("Responsibilities:\n");
            for item in &self.responsibilities {
                text.push_str(&format!("- {}\n", item.trim()));
            }
        }
        text
    }
}

impl JobInput {
    /// Structured view of the job, reconstructing it from raw text when needed
    pub fn requirement(&self, parser: &JobDescriptionParser) -> JobRequirement {
        match self {
            JobInput::Structured(requirement) => requirement.clone(),
            JobInput::Raw(text) => parser.parse(text),
        }
    }

    /// Full job description text, used as fallback model context
    pub fn description_text(&self) -> String {
        match self {
            JobInput::Structured(requirement) => requirement.to_description_text(),
            JobInput::Raw(text) => text.clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(JobInput::Structured(serde_json::from_str(json)?))
    }
}

impl From<JobRequirement> for JobInput {
    fn from(requirement: JobRequirement) -> Self {
        JobInput::Structured(requirement)
    }
}

impl From<String> for JobInput {
    fn from(text: String) -> Self {
        JobInput::Raw(text)
    }
}

fn join(skills: &BTreeSet<String>) -> String {
    skills.iter().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobRequirement {
        JobRequirement {
            job_title: "Backend Engineer".to_string(),
            required_skills: ["python".to_string(), "java".to_string()].into_iter().collect(),
            preferred_skills: ["sql".to_string()].into_iter().collect(),
            experience_required: "5+ years".to_string(),
            education: "Bachelor's degree".to_string(),
            responsibilities: vec!["Design APIs".to_string()],
        }
    }

    #[test]
    fn test_description_text_lists_all_fields() {
        let text = sample().to_description_text();
        assert!(text.contains("Job Title: Backend Engineer"));
        assert!(text.contains("Required Skills: java, python"));
        assert!(text.contains("Preferred Skills: sql"));
        assert!(text.contains("Experience Required: 5+ years"));
        assert!(text.contains("- Design APIs"));
    }

    #[test]
    fn test_raw_input_keeps_original_text() {
        let input = JobInput::Raw("We are hiring a Rust developer.".to_string());
        assert_eq!(input.description_text(), "We are hiring a Rust developer.");
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let input = JobInput::from_json(r#"{"job_title": "Analyst"}"#).unwrap();
        match input {
            JobInput::Structured(req) => {
                assert_eq!(req.job_title, "Analyst");
                assert!(req.required_skills.is_empty());
                assert!(req.experience_required.is_empty());
            }
            JobInput::Raw(_) => panic!("expected structured input"),
        }
    }
}
