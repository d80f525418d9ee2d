//! Years-of-experience scoring

use crate::profile::ExperienceEntry;
use crate::scoring::clamp_score;

/// Returned when the requirement is ambiguous or cannot be evaluated
pub const NEUTRAL_EXPERIENCE_SCORE: f64 = 50.0;

pub fn experience_match_score(entries: &[ExperienceEntry], experience_required: &str) -> f64 {
    match compare_years(total_resume_years(entries), required_years(experience_required)) {
        Some(score) => clamp_score(score),
        None => NEUTRAL_EXPERIENCE_SCORE,
    }
}

fn compare_years(resume_years: f64, required_years: f64) -> Option<f64> {
    if required_years == 0.0 {
        return Some(NEUTRAL_EXPERIENCE_SCORE);
    }
    if !resume_years.is_finite() {
        return None;
    }

    if resume_years >= required_years {
        Some(100.0)
    } else {
        Some(resume_years / required_years * 100.0)
    }
}

/// Sum of the leading year counts of every duration mentioning "year",
/// taken as written. Durations whose first token is not a number contribute nothing.
pub fn total_resume_years(entries: &[ExperienceEntry]) -> f64 {
    entries
        .iter()
        .filter_map(|entry| {
            let duration = entry.duration.to_lowercase();
            if !duration.contains("year") {
                return None;
            }
            duration
                .split_whitespace()
                .next()
                .and_then(parse_finite)
        })
        .sum()
}

/// First whitespace token of the requirement (with "+" removed) that parses
/// as a number, or 0 when there is none.
pub fn required_years(experience_required: &str) -> f64 {
    experience_required
        .replace('+', "")
        .to_lowercase()
        .split_whitespace()
        .find_map(parse_finite)
        .unwrap_or(0.0)
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
