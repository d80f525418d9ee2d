//! Education level scoring on a fixed ordinal ladder

use crate::profile::EducationEntry;
use crate::scoring::clamp_score;

/// Ordinal degree ladder; "phd" and "doctorate" are synonyms
pub const EDUCATION_LADDER: &[(&str, u8)] = &[
    ("high school", 1),
    ("associate", 2),
    ("bachelor", 3),
    ("master", 4),
    ("phd", 5),
    ("doctorate", 5),
];

pub fn education_match_score(entries: &[EducationEntry], education_required: &str) -> f64 {
    let resume = resume_level(entries);
    let required = required_level(education_required);

    if required == 0 || resume >= required {
        100.0
    } else {
        clamp_score(f64::from(resume) / f64::from(required) * 100.0)
    }
}

/// Highest ladder level named in any résumé degree, 0 if none
pub fn resume_level(entries: &[EducationEntry]) -> u8 {
    entries
        .iter()
        .map(|entry| ladder_level(&entry.degree))
        .max()
        .unwrap_or(0)
}

/// Highest ladder level named in the requirement text, 0 if none
pub fn required_level(education_required: &str) -> u8 {
    ladder_level(education_required)
}

fn ladder_level(text: &str) -> u8 {
    let lower = text.to_lowercase();
    EDUCATION_LADDER
        .iter()
        .filter(|(label, _)| lower.contains(label))
        .map(|(_, level)| *level)
        .max()
        .unwrap_or(0)
}
