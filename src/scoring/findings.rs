//! Qualitative strengths and gaps

use crate::profile::{CandidateProfile, JobRequirement};
use crate::scoring::{education, experience, skills};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strength {
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub relevance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gap {
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub importance: String,
}

/// Strings pass through, numbers and booleans are stringified, anything else is empty
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Strengths and gaps derived from the structured records alone.
/// Used when the narrative stage could not supply its own.
pub fn heuristic_findings(candidate: &CandidateProfile, job: &JobRequirement) -> (Vec<Strength>, Vec<Gap>) {
    let mut strengths = Vec::new();
    let mut gaps = Vec::new();

    let matched_required = skills::matched_skills(&candidate.skills, &job.required_skills);
    let matched_preferred = skills::matched_skills(&candidate.skills, &job.preferred_skills);
    let missing_required = skills::missing_skills(&candidate.skills, &job.required_skills);

    if !matched_required.is_empty() {
        strengths.push(Strength {
            category: "skills".to_string(),
            description: format!(
                "Has {} of {} required skills: {}",
                matched_required.len(),
                job.required_skills.len(),
                matched_required.join(", ")
            ),
            relevance: "Covers core requirements of the role".to_string(),
        });
    }
    if !matched_preferred.is_empty() {
        strengths.push(Strength {
            category: "skills".to_string(),
            description: format!(
                "Has {} preferred skills: {}",
                matched_preferred.len(),
                matched_preferred.join(", ")
            ),
            relevance: "Goes beyond the minimum skill set".to_string(),
        });
    }
    if !missing_required.is_empty() {
        gaps.push(Gap {
            category: "skills".to_string(),
            description: format!(
                "Missing {} required skills: {}",
                missing_required.len(),
                missing_required.join(", ")
            ),
            importance: "High: listed as required for the role".to_string(),
        });
    }

    let resume_years = experience::total_resume_years(&candidate.experience);
    let required_years = experience::required_years(&job.experience_required);
    if resume_years > 0.0 {
        let relevance = if required_years > 0.0 {
            format!("Role asks for {} years", format_years(required_years))
        } else {
            "Role does not state a year requirement".to_string()
        };
        strengths.push(Strength {
            category: "experience".to_string(),
            description: format!("Has {} years of relevant experience", format_years(resume_years)),
            relevance,
        });
    }
    if required_years > 0.0 && resume_years < required_years {
        gaps.push(Gap {
            category: "experience".to_string(),
            description: format!(
                "Has {} of the {} years required",
                format_years(resume_years),
                format_years(required_years)
            ),
            importance: "Medium: experience shortfall".to_string(),
        });
    }

    let resume_level = education::resume_level(&candidate.education);
    let required_level = education::required_level(&job.education);
    if resume_level > 0 && resume_level >= required_level {
        strengths.push(Strength {
            category: "education".to_string(),
            description: "Education meets or exceeds the stated requirement".to_string(),
            relevance: if job.education.trim().is_empty() {
                "No formal education requirement".to_string()
            } else {
                format!("Requirement: {}", job.education.trim())
            },
        });
    } else if required_level > resume_level {
        gaps.push(Gap {
            category: "education".to_string(),
            description: "Highest degree is below the required level".to_string(),
            importance: format!("Medium: requirement is {}", job.education.trim()),
        });
    }

    (strengths, gaps)
}

fn format_years(years: f64) -> String {
    format!("{:.1}", years)
}
