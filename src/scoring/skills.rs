//! Skill overlap scoring with case-insensitive substring containment

use crate::scoring::clamp_score;
use std::collections::BTreeSet;

pub const REQUIRED_WEIGHT: f64 = 0.7;
pub const PREFERRED_WEIGHT: f64 = 0.3;

/// A job skill counts as matched when it is a substring of any résumé skill,
/// so "java" is matched by "javascript" but not the other way round.
pub fn skill_match_score(
    resume_skills: &BTreeSet<String>,
    required_skills: &BTreeSet<String>,
    preferred_skills: &BTreeSet<String>,
) -> f64 {
    if resume_skills.is_empty() || (required_skills.is_empty() && preferred_skills.is_empty()) {
        return 0.0;
    }

    let resume_lower: Vec<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();

    let required_matches = count_matches(&resume_lower, required_skills);
    let preferred_matches = count_matches(&resume_lower, preferred_skills);

    let required_fraction = required_matches as f64 / required_skills.len().max(1) as f64;
    let preferred_fraction = if preferred_skills.is_empty() {
        0.0
    } else {
        preferred_matches as f64 / preferred_skills.len() as f64
    };

    clamp_score(REQUIRED_WEIGHT * required_fraction * 100.0 + PREFERRED_WEIGHT * preferred_fraction * 100.0)
}

/// Job skills that are matched by some résumé skill, lower-cased
pub fn matched_skills(resume_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> Vec<String> {
    let resume_lower: Vec<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    job_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|skill| is_matched(&resume_lower, skill))
        .collect()
}

/// Job skills that no résumé skill contains, lower-cased
pub fn missing_skills(resume_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> Vec<String> {
    let resume_lower: Vec<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    job_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|skill| !is_matched(&resume_lower, skill))
        .collect()
}

fn count_matches(resume_lower: &[String], job_skills: &BTreeSet<String>) -> usize {
    job_skills
        .iter()
        .filter(|skill| is_matched(resume_lower, &skill.to_lowercase()))
        .count()
}

fn is_matched(resume_lower: &[String], skill: &str) -> bool {
    resume_lower.iter().any(|rs| rs.contains(skill))
}
