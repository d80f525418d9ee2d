//! CLI interface for the candidate matcher

use crate::config::OutputFormat;
use crate::engine::AggregationPolicy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "candidate-matcher")]
#[command(about = "Score how well a candidate profile matches a job requirement")]
#[command(
    long_about = "Combine heuristic skill/experience/education scores, embedding retrieval over the job description and a generative model's narrative analysis into one auditable match score"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a candidate against a job
    Evaluate {
        /// Candidate profile (JSON)
        #[arg(long)]
        candidate: PathBuf,

        /// Structured job requirement (JSON)
        #[arg(long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Raw job description (TXT, MD)
        #[arg(long)]
        job_text: Option<PathBuf>,

        /// Aggregation policy: heuristic, narrative
        #[arg(short, long)]
        policy: Option<String>,

        /// Embedding model (HuggingFace repo id or local path)
        #[arg(short, long)]
        embedding: Option<String>,

        /// Chat model name for the narrative analysis
        #[arg(short, long)]
        llm: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip the narrative analysis (no generative model call)
        #[arg(long)]
        no_llm: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_policy(policy: &str) -> Result<AggregationPolicy, String> {
    policy.parse().map_err(|e: crate::error::MatcherError| e.to_string())
}

pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("json").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("narrative").unwrap(), AggregationPolicy::Narrative);
        assert!(parse_policy("mean").unwrap_err().contains("heuristic, narrative"));
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("job.MD"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("job.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("job"), &["txt"]).is_err());
    }

    #[test]
    fn test_job_sources_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "candidate-matcher",
            "evaluate",
            "--candidate",
            "c.json",
            "--job",
            "j.json",
            "--job-text",
            "j.md",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["candidate-matcher", "evaluate", "--candidate", "c.json"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "candidate-matcher",
            "evaluate",
            "--candidate",
            "c.json",
            "--job-text",
            "j.md",
            "--no-llm",
        ]);
        assert!(parsed.is_ok());
    }
}
