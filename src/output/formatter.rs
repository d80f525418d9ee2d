//! Output formatters for evaluation reports

use crate::config::OutputFormat;
use crate::engine::{Recommendation, ScoreBreakdown};
use crate::error::{MatcherError, Result};
use crate::output::report::EvaluationReport;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

const FRAGMENT_PREVIEW_GRAPHEMES: usize = 240;

pub trait OutputFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    detailed: bool,
}

/// Routes a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_recommendation_badge(&self, recommendation: Recommendation) -> String {
        let (badge, color) = match recommendation {
            Recommendation::Shortlist => ("SHORTLIST", Color::Green),
            Recommendation::Review => ("REVIEW", Color::Yellow),
            Recommendation::Reject => ("REJECT", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn score_line(&self, label: &str, score: f64, weight: f64) -> String {
        let line = format!("  {:<12} {:>6.2}  (weight {:.0}%)\n", label, score, weight * 100.0);
        if weight > 0.0 {
            line
        } else {
            self.colorize(&line, Color::BrightBlack)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let weights = breakdown.policy.weights();
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE MATCH EVALUATION", 1));
        output.push_str(&format!(
            "Candidate: {} | Position: {}\n",
            report.metadata.candidate_name, report.metadata.job_title
        ));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Final Score: {:.2} {}\n",
            breakdown.final_score,
            self.format_recommendation_badge(breakdown.recommendation)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict(), Color::Cyan)));
        if breakdown.should_shortlist() {
            output.push_str(&format!("{}\n", self.colorize("Eligible for interview scheduling", Color::Green)));
        }

        output.push_str(&self.format_header(&format!("Score Breakdown ({} policy)", breakdown.policy), 3));
        output.push_str(&self.score_line("Skills", breakdown.skill_score, weights.skill));
        output.push_str(&self.score_line("Experience", breakdown.experience_score, weights.experience));
        output.push_str(&self.score_line("Education", breakdown.education_score, weights.education));
        output.push_str(&self.score_line("Semantic", breakdown.semantic_score, weights.semantic));
        output.push_str(&self.score_line("Model", breakdown.llm_score, weights.llm));

        if !breakdown.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 3));
            for strength in &breakdown.strengths {
                output.push_str(&format!(
                    "  • {}\n",
                    self.colorize(&finding_line(&strength.category, &strength.description), Color::Green)
                ));
                if self.detailed && !strength.relevance.is_empty() {
                    output.push_str(&format!("      {}\n", strength.relevance));
                }
            }
        }

        if !breakdown.gaps.is_empty() {
            output.push_str(&self.format_header("Gaps", 3));
            for gap in &breakdown.gaps {
                output.push_str(&format!(
                    "  • {}\n",
                    self.colorize(&finding_line(&gap.category, &gap.description), Color::Yellow)
                ));
                if self.detailed && !gap.importance.is_empty() {
                    output.push_str(&format!("      {}\n", gap.importance));
                }
            }
        }

        if !breakdown.detailed_analysis.is_empty() {
            output.push_str(&self.format_header("Analysis", 3));
            output.push_str(&format!("{}\n", breakdown.detailed_analysis));
            if !breakdown.model_recommendation.is_empty() {
                output.push_str(&format!(
                    "{} {}\n",
                    self.colorize("Model recommendation:", Color::Cyan),
                    breakdown.model_recommendation
                ));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Job Context", 3));
            output.push_str(&format_fragment_previews(breakdown));
        }

        if !breakdown.errors.is_empty() {
            output.push_str(&self.format_header("Degraded Stages", 3));
            for error in &breakdown.errors {
                output.push_str(&format!(
                    "  [!] {}: {}\n",
                    self.colorize(&error.stage.to_string(), Color::Red),
                    error.message
                ));
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, detailed: bool) -> Self {
        Self {
            include_metadata,
            detailed,
        }
    }

    fn recommendation_badge(recommendation: Recommendation) -> &'static str {
        match recommendation {
            Recommendation::Shortlist => "🟢 Shortlist",
            Recommendation::Review => "🟡 Review",
            Recommendation::Reject => "🔴 Reject",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let weights = breakdown.policy.weights();
        let mut output = String::new();

        output.push_str(&format!("# Match Evaluation: {}\n\n", report.metadata.candidate_name));
        output.push_str(&format!("**Position:** {}\n\n", report.metadata.job_title));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Version:** {}\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.matcher_version
            ));
            if let (Some(candidate_file), Some(job_file)) = (&report.metadata.candidate_file, &report.metadata.job_file) {
                output.push_str(&format!(
                    "**Candidate:** `{}` | **Job:** `{}`\n\n",
                    file_name(candidate_file),
                    file_name(job_file)
                ));
            }
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Final Score:** {:.2} {}\n\n",
            breakdown.final_score,
            Self::recommendation_badge(breakdown.recommendation)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict()));

        output.push_str(&format!("### Score Breakdown ({} policy)\n\n", breakdown.policy));
        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        for (label, score, weight) in [
            ("Skills", breakdown.skill_score, weights.skill),
            ("Experience", breakdown.experience_score, weights.experience),
            ("Education", breakdown.education_score, weights.education),
            ("Semantic", breakdown.semantic_score, weights.semantic),
            ("Model", breakdown.llm_score, weights.llm),
        ] {
            output.push_str(&format!("| {} | {:.2} | {:.0}% |\n", label, score, weight * 100.0));
        }
        output.push('\n');

        if !breakdown.strengths.is_empty() {
            output.push_str("## Strengths\n\n");
            for strength in &breakdown.strengths {
                output.push_str(&format!("- {}", finding_line(&strength.category, &strength.description)));
                if self.detailed && !strength.relevance.is_empty() {
                    output.push_str(&format!(" _({})_", strength.relevance));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !breakdown.gaps.is_empty() {
            output.push_str("## Gaps\n\n");
            for gap in &breakdown.gaps {
                output.push_str(&format!("- {}", finding_line(&gap.category, &gap.description)));
                if self.detailed && !gap.importance.is_empty() {
                    output.push_str(&format!(" _({})_", gap.importance));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !breakdown.detailed_analysis.is_empty() {
            output.push_str("## Analysis\n\n");
            output.push_str(&format!("{}\n\n", breakdown.detailed_analysis));
            if !breakdown.model_recommendation.is_empty() {
                output.push_str(&format!("**Model recommendation:** {}\n\n", breakdown.model_recommendation));
            }
        }

        if self.detailed {
            output.push_str("## Job Context\n\n");
            output.push_str(&format_fragment_previews(breakdown));
            output.push('\n');
        }

        if !breakdown.errors.is_empty() {
            output.push_str("## Degraded Stages\n\n");
            for error in &breakdown.errors {
                output.push_str(&format!("- **{}:** {}\n", error.stage, error.message));
            }
            output.push('\n');
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, detailed),
        }
    }

    pub fn generate_report(&self, report: &EvaluationReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)
        .map_err(|e| MatcherError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e)))
}

/// A directory target gets a generated file name inside it
pub fn resolve_save_path(target: &Path, format: &OutputFormat, candidate_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, candidate_name, true))
    } else {
        target.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, candidate_name: &str, timestamp: bool) -> String {
    let base_name: String = candidate_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let base_name = if base_name.is_empty() { "candidate".to_string() } else { base_name };

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_evaluation{}.{}", base_name, timestamp_suffix, extension)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn finding_line(category: &str, description: &str) -> String {
    if category.is_empty() {
        description.to_string()
    } else {
        format!("[{}] {}", category, description)
    }
}

fn format_fragment_previews(breakdown: &ScoreBreakdown) -> String {
    let mut output = String::new();
    for fragment in &breakdown.fragments {
        let label = if fragment.fallback {
            "Full job description (fallback)".to_string()
        } else {
            format!("Fragment {}", fragment.source_rank + 1)
        };
        output.push_str(&format!("  {}: {}\n", label, truncate_graphemes(&fragment.text, FRAGMENT_PREVIEW_GRAPHEMES)));
    }
    output
}

/// Truncate on grapheme boundaries, appending "..." when shortened
fn truncate_graphemes(text: &str, max_graphemes: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let graphemes: Vec<&str> = flattened.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        flattened
    } else {
        format!("{}...", graphemes[..max_graphemes].concat().trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AggregationPolicy, Stage, StageError};
    use crate::output::report::ReportMetadata;
    use crate::retrieval::RetrievedFragment;
    use crate::scoring::findings::{Gap, Strength};

    fn report() -> EvaluationReport {
        let breakdown = ScoreBreakdown {
            skill_score: 65.0,
            experience_score: 60.0,
            education_score: 100.0,
            semantic_score: 40.0,
            llm_score: 0.0,
            final_score: 68.0,
            strengths: vec![Strength {
                category: "skills".to_string(),
                description: "Has 1 of 2 required skills: python".to_string(),
                relevance: "Covers core requirements of the role".to_string(),
            }],
            gaps: vec![Gap {
                category: "skills".to_string(),
                description: "Missing 1 required skills: java".to_string(),
                importance: "High".to_string(),
            }],
            recommendation: Recommendation::Review,
            policy: AggregationPolicy::Heuristic,
            detailed_analysis: "not json".to_string(),
            model_recommendation: String::new(),
            fragments: vec![RetrievedFragment {
                text: "Full posting text".to_string(),
                source_rank: 0,
                fallback: true,
            }],
            used_fallback_context: true,
            errors: vec![StageError {
                stage: Stage::Narrative,
                message: "Failed to parse model response as JSON".to_string(),
            }],
        };
        EvaluationReport::new(breakdown, ReportMetadata::new("Ada Lovelace", "Data Engineer"))
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(output.contains("Candidate: Ada Lovelace | Position: Data Engineer"));
        assert!(output.contains("Final Score: 68.00 [REVIEW]"));
        assert!(output.contains("[skills] Missing 1 required skills: java"));
        assert!(output.contains("Full job description (fallback): Full posting text"));
        assert!(output.contains("[!] narrative: Failed to parse model response as JSON"));
        assert!(output.contains("low confidence"));
    }

    #[test]
    fn test_json_round_trips_breakdown() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["breakdown"]["final_score"], 68.0);
        assert_eq!(value["breakdown"]["recommendation"], "review");
        assert_eq!(value["breakdown"]["policy"], "heuristic");
        assert_eq!(value["breakdown"]["errors"][0]["stage"], "narrative");
        assert_eq!(value["metadata"]["candidate_name"], "Ada Lovelace");
    }

    #[test]
    fn test_markdown_table_and_sections() {
        let output = MarkdownFormatter::new(false, false).format_report(&report()).unwrap();
        assert!(output.starts_with("# Match Evaluation: Ada Lovelace"));
        assert!(output.contains("| Skills | 65.00 | 40% |"));
        assert!(output.contains("| Model | 0.00 | 0% |"));
        assert!(output.contains("## Degraded Stages"));
        assert!(!output.contains("## Job Context"));
    }

    #[test]
    fn test_generator_routes_by_format() {
        let generator = ReportGenerator::with_options(false, false, true, true);
        let json = generator.generate_report(&report(), &OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let markdown = generator.generate_report(&report(), &OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("**Generated:**"));
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("short  text", 20), "short text");
        assert_eq!(truncate_graphemes("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "Ada Lovelace", false),
            "ada_lovelace_evaluation.md"
        );
        assert_eq!(suggest_filename(&OutputFormat::Json, "", false), "candidate_evaluation.json");
    }

    #[test]
    fn test_save_into_directory_uses_generated_name() {
        let dir = tempfile::TempDir::new().unwrap();

        let path = resolve_save_path(dir.path(), &OutputFormat::Json, "Ada Lovelace");
        assert_eq!(path.parent().unwrap(), dir.path());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("ada_lovelace_evaluation_"));
        assert!(name.ends_with(".json"));

        let explicit = dir.path().join("report.md");
        assert_eq!(resolve_save_path(&explicit, &OutputFormat::Markdown, "Ada"), explicit);
    }
}
