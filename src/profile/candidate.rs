//! Structured candidate profile built from upstream résumé parsing

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: BTreeSet<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub field: String,
}

impl CandidateProfile {
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or("The candidate")
    }

    /// Render the profile as the text used for retrieval queries and prompts
    pub fn to_profile_text(&self) -> String {
        let mut text = String::from("Candidate Profile:\n");
        text.push_str(&format!(
            "Name: {}\n",
            non_empty(self.name.as_deref()).unwrap_or(NOT_AVAILABLE)
        ));
        text.push_str(&format!(
            "Email: {}\n\n",
            non_empty(self.email.as_deref()).unwrap_or(NOT_AVAILABLE)
        ));

        text.push_str("Skills:\n");
        if self.skills.is_empty() {
            text.push_str(NOT_AVAILABLE);
        } else {
            text.push_str(&self.skills.iter().cloned().collect::<Vec<_>>().join(", "));
        }
        text.push_str("\n\nExperience:\n");
        if self.experience.is_empty() {
            text.push_str(NOT_AVAILABLE);
            text.push('\n');
        }
        for entry in &self.experience {
            text.push_str(&format!("- {}\n", entry.summary_line()));
        }

        text.push_str("\nEducation:\n");
        if self.education.is_empty() {
            text.push_str(NOT_AVAILABLE);
            text.push('\n');
        }
        for entry in &self.education {
            text.push_str(&format!("- {}\n", entry.summary_line()));
        }

        text.push_str("\nAdditional Information:\n");
        text.push_str(non_empty(self.additional_info.as_deref()).unwrap_or(NOT_AVAILABLE));
        text.push('\n');
        text
    }
}

impl ExperienceEntry {
    fn summary_line(&self) -> String {
        let mut line = match (self.title.trim(), self.company.trim()) {
            ("", "") => NOT_AVAILABLE.to_string(),
            (title, "") => title.to_string(),
            ("", company) => company.to_string(),
            (title, company) => format!("{} at {}", title, company),
        };
        if !self.duration.trim().is_empty() {
            line.push_str(&format!(" ({})", self.duration.trim()));
        }
        if !self.description.trim().is_empty() {
            line.push_str(&format!(": {}", self.description.trim()));
        }
        line
    }
}

impl EducationEntry {
    fn summary_line(&self) -> String {
        match (self.degree.trim(), self.field.trim()) {
            ("", "") => NOT_AVAILABLE.to_string(),
            (degree, "") => degree.to_string(),
            ("", field) => field.to_string(),
            (degree, field) => format!("{} in {}", degree, field),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_absent() {
        let profile: CandidateProfile = serde_json::from_str(r#"{"skills": ["Rust"]}"#).unwrap();
        assert!(profile.name.is_none());
        assert!(profile.experience.is_empty());
        assert_eq!(profile.skills.len(), 1);
    }

    #[test]
    fn test_profile_text_uses_placeholders() {
        let profile = CandidateProfile::default();
        let text = profile.to_profile_text();
        assert!(text.contains("Name: N/A"));
        assert!(text.contains("Email: N/A"));
        assert!(text.contains("Additional Information:\nN/A"));
    }

    #[test]
    fn test_profile_text_lists_entries() {
        let profile = CandidateProfile {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            skills: ["python".to_string(), "sql".to_string()].into_iter().collect(),
            experience: vec![ExperienceEntry {
                title: "Data Engineer".to_string(),
                company: "Acme".to_string(),
                duration: "3 years".to_string(),
                description: "Built pipelines".to_string(),
            }],
            education: vec![EducationEntry {
                degree: "Master of Science".to_string(),
                field: "Computer Science".to_string(),
            }],
            additional_info: None,
        };

        let text = profile.to_profile_text();
        assert!(text.contains("Name: Jane Doe"));
        assert!(text.contains("python, sql"));
        assert!(text.contains("- Data Engineer at Acme (3 years): Built pipelines"));
        assert!(text.contains("- Master of Science in Computer Science"));
        assert_eq!(profile.display_name(), "Jane Doe");
    }
}
