//! Reconstruct a structured job requirement from raw description text

use crate::error::{MatcherError, Result};
use crate::profile::job::JobRequirement;
use crate::scoring::education::EDUCATION_LADDER;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

const PREFERRED_MARKERS: &[&str] = &["preferred", "nice to have", "nice-to-have", "bonus", "a plus", "desirable"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum JobSection {
    Intro,
    Responsibilities,
    Requirements,
    Preferred,
}

/// Deterministic job description parser backed by a skill vocabulary
pub struct JobDescriptionParser {
    skill_matcher: AhoCorasick,
    vocabulary: Vec<String>,
    years_regex: Regex,
    title_regex: Regex,
}

impl JobDescriptionParser {
    pub fn new() -> Result<Self> {
        Self::with_additional_skills(Vec::new())
    }

    pub fn with_additional_skills(additional_skills: Vec<String>) -> Result<Self> {
        let mut vocabulary: Vec<String> = default_skill_vocabulary()
            .iter()
            .map(|s| s.to_string())
            .chain(additional_skills.into_iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();
        vocabulary.sort();
        vocabulary.dedup();

        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&vocabulary)
            .map_err(|e| MatcherError::InvalidInput(format!("Failed to build skill matcher: {}", e)))?;

        let years_regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(\+)?\s*(?:(?:-|to)\s*\d+(?:\.\d+)?\s*)?\+?\s*years?")
            .map_err(|e| MatcherError::InvalidInput(e.to_string()))?;
        let title_regex = Regex::new(r"(?i)^(?:job\s+title|title|position|role)\s*:\s*(.+)$")
            .map_err(|e| MatcherError::InvalidInput(e.to_string()))?;

        Ok(Self {
            skill_matcher,
            vocabulary,
            years_regex,
            title_regex,
        })
    }

    pub fn parse(&self, text: &str) -> JobRequirement {
        let mut requirement = JobRequirement::default();
        let mut section = JobSection::Intro;

        for raw_line in text.lines() {
            let mut line = strip_decoration(raw_line);
            if line.is_empty() {
                continue;
            }

            if let Some((heading, rest)) = detect_heading(raw_line, line) {
                section = heading;
                if rest.is_empty() {
                    continue;
                }
                line = rest;
            }

            // The title line is still scanned: one-line postings carry everything there
            if requirement.job_title.is_empty() {
                if let Some(caps) = self.title_regex.captures(line) {
                    requirement.job_title = caps[1].trim().to_string();
                } else if section == JobSection::Intro && line.len() < 100 && !line.contains('@') {
                    requirement.job_title = line.trim_end_matches(':').to_string();
                }
            }

            // Preference markers apply per sentence: "Python required. Kafka is a plus."
            for sentence in line.unicode_sentences() {
                let sentence_lower = sentence.to_lowercase();
                let preferred = section == JobSection::Preferred
                    || PREFERRED_MARKERS.iter().any(|marker| sentence_lower.contains(marker));

                for skill in self.find_skills(sentence) {
                    if preferred {
                        requirement.preferred_skills.insert(skill);
                    } else {
                        requirement.required_skills.insert(skill);
                    }
                }
            }

            let lower = line.to_lowercase();

            if requirement.experience_required.is_empty() {
                if let Some(years) = self.extract_years(line) {
                    requirement.experience_required = years;
                }
            }

            if requirement.education.is_empty() && mentions_education(&lower) {
                requirement.education = line.to_string();
            }

            if section == JobSection::Responsibilities && is_bullet(raw_line) {
                requirement.responsibilities.push(line.to_string());
            }
        }

        // A skill listed as required anywhere is not merely preferred
        let required = requirement.required_skills.clone();
        requirement.preferred_skills.retain(|s| !required.contains(s));

        debug!(
            "Parsed job description: title='{}', {} required, {} preferred skills",
            requirement.job_title,
            requirement.required_skills.len(),
            requirement.preferred_skills.len()
        );

        requirement
    }

    /// Vocabulary skills occurring in the line on word boundaries, lower-cased
    fn find_skills(&self, line: &str) -> BTreeSet<String> {
        let bytes = line.as_bytes();
        self.skill_matcher
            .find_iter(line)
            .filter(|mat| {
                let before_ok = mat.start() == 0 || !bytes[mat.start() - 1].is_ascii_alphanumeric();
                let after_ok = mat.end() >= bytes.len() || !bytes[mat.end()].is_ascii_alphanumeric();
                before_ok && after_ok
            })
            .map(|mat| self.vocabulary[mat.pattern().as_usize()].clone())
            .collect()
    }

    /// Normalise the first year-count phrase so the leading token is numeric
    fn extract_years(&self, line: &str) -> Option<String> {
        let caps = self.years_regex.captures(line)?;
        let whole = caps.get(0)?;
        let number = caps.get(1)?.as_str();
        let plus = if caps.get(2).is_some() || whole.as_str().contains('+') { "+" } else { "" };
        let rest = line[whole.end()..].trim();

        let mut years = format!("{}{} years", number, plus);
        if !rest.is_empty() {
            years.push(' ');
            years.push_str(rest);
        }
        Some(years)
    }
}

fn strip_decoration(line: &str) -> &str {
    let line = line
        .trim()
        .trim_start_matches(|c: char| c == '#' || c == '-' || c == '*' || c == '•' || c == '>')
        .trim();
    let line = match line.split_once(". ") {
        Some((n, rest)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => line,
    };
    line.trim_matches('*').trim()
}

fn is_bullet(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["- ", "* ", "• "].iter().any(|b| trimmed.starts_with(b))
        || trimmed
            .split_once(". ")
            .map_or(false, |(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Section named by a heading line, plus any content following "Heading:" on the same line
fn detect_heading<'a>(raw_line: &str, line: &'a str) -> Option<(JobSection, &'a str)> {
    if is_bullet(raw_line) {
        return None;
    }

    let (head, rest) = match line.split_once(':') {
        Some((head, rest)) => (head.trim(), rest.trim()),
        None => {
            let marked = raw_line.trim_start().starts_with('#');
            if !marked && (line.len() > 40 || line.split_whitespace().count() > 4) {
                return None;
            }
            (line, "")
        }
    };
    if head.is_empty() || head.len() > 60 {
        return None;
    }

    let lower = head.to_lowercase();
    if lower.split_whitespace().count() > 6 {
        return None;
    }

    let section = classify_heading(&lower)?;
    Some((section, rest))
}

fn classify_heading(lower: &str) -> Option<JobSection> {
    if ["responsibilities", "what you'll do", "what you will do", "duties", "the role"]
        .iter()
        .any(|h| lower.contains(h))
    {
        Some(JobSection::Responsibilities)
    } else if ["preferred", "nice to have", "nice-to-have", "bonus points", "pluses"]
        .iter()
        .any(|h| lower.contains(h))
    {
        Some(JobSection::Preferred)
    } else if ["requirements", "qualifications", "must have", "must-have", "what you bring", "who you are"]
        .iter()
        .any(|h| lower.contains(h))
    {
        Some(JobSection::Requirements)
    } else {
        None
    }
}

fn mentions_education(lower: &str) -> bool {
    lower.contains("degree") || EDUCATION_LADDER.iter().any(|(label, _)| lower.contains(label))
}

fn default_skill_vocabulary() -> &'static [&'static str] {
    &[
        // Programming languages
        "rust", "python", "javascript", "typescript", "java", "c++", "c#", "golang", "ruby",
        "php", "swift", "kotlin", "scala", "haskell", "clojure", "matlab", "sql",
        // Web
        "react", "vue", "angular", "svelte", "html", "css", "sass", "tailwind", "node.js",
        "express", "next.js", "django", "flask", "fastapi", "spring",
        // Infrastructure
        "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible", "jenkins",
        "ci/cd", "devops", "microservices", "rest", "graphql", "grpc", "redis",
        "elasticsearch", "nginx", "linux", "git",
        // Databases
        "postgresql", "mysql", "mongodb", "cassandra", "dynamodb", "sqlite", "oracle",
        "neo4j", "snowflake",
        // Data and ML
        "machine learning", "deep learning", "nlp", "tensorflow", "pytorch", "scikit-learn",
        "pandas", "numpy", "spark", "hadoop", "kafka", "airflow", "tableau", "power bi",
        "excel", "statistics",
        // Practices
        "agile", "scrum", "tdd", "testing",
        // Soft skills
        "leadership", "communication", "teamwork", "problem solving", "project management",
        "mentoring", "collaboration",
    ]
}
