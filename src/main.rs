//! Candidate matcher: score candidate profiles against job requirements

use candidate_matcher::cli::{self, Cli, Commands, ConfigAction};
use candidate_matcher::config::Config;
use candidate_matcher::engine::{AggregationPolicy, MatchEngine, ScoreBreakdown};
use candidate_matcher::error::{MatcherError, Result};
use candidate_matcher::input::InputManager;
use candidate_matcher::llm::{ChatCompletionGenerator, PromptTemplate, TextGenerator};
use candidate_matcher::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use candidate_matcher::output::report::{EvaluationReport, ReportMetadata};
use candidate_matcher::profile::{CandidateProfile, JobInput, JobRequirement};
use candidate_matcher::retrieval::{embedder_or_unavailable, index_job_description, Model2VecEmbedder};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Evaluate {
            candidate,
            job,
            job_text,
            policy,
            embedding,
            llm,
            detailed,
            output,
            save,
            no_llm,
        } => {
            cli::validate_file_extension(&candidate, &["json"])
                .map_err(|e| MatcherError::InvalidInput(format!("Candidate file: {}", e)))?;

            let job_path = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["json"])
                        .map_err(|e| MatcherError::InvalidInput(format!("Job file: {}", e)))?;
                    path
                }
                (None, Some(path)) => {
                    cli::validate_file_extension(&path, &["txt", "md", "markdown"])
                        .map_err(|e| MatcherError::InvalidInput(format!("Job description file: {}", e)))?;
                    path
                }
                (None, None) => {
                    return Err(MatcherError::InvalidInput(
                        "Either --job or --job-text is required".to_string(),
                    ))
                }
            };

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?,
                None => config.output.format,
            };
            let policy = match policy {
                Some(policy) => cli::parse_policy(&policy).map_err(MatcherError::InvalidInput)?,
                None => config.scoring.policy,
            };
            if let Some(embedding_model) = embedding {
                config.models.embedding_model = embedding_model;
            }
            if let Some(llm_model) = llm {
                config.models.llm.model = llm_model;
            }
            let use_llm = !no_llm;
            if !use_llm {
                info!("Narrative analysis disabled");
            }

            let mut input_manager = InputManager::new();
            let candidate_profile = input_manager.load_candidate(&candidate).await?;
            let job_input = input_manager.load_job(&job_path).await?;
            let candidate_name = candidate_profile.display_name().to_string();

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner.set_message(format!("Evaluating {} ({} policy)...", candidate_name, policy));

            let started = Instant::now();
            let evaluation_config = config.clone();
            let result = tokio::task::spawn_blocking(move || {
                run_evaluation(&evaluation_config, candidate_profile, job_input, policy, use_llm)
            })
            .await
            .map_err(|e| MatcherError::Runtime(format!("Evaluation task failed: {}", e)));
            spinner.finish_and_clear();
            let (breakdown, requirement) = result??;

            let metadata = ReportMetadata::new(candidate_name, requirement.job_title)
                .with_files(candidate.display().to_string(), job_path.display().to_string())
                .with_models(
                    config.models.embedding_model.clone(),
                    use_llm.then(|| config.models.llm.model.clone()),
                )
                .with_processing_time(started.elapsed().as_millis() as u64);
            let report = EvaluationReport::new(breakdown, metadata);

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;
            println!("{}", rendered);

            if let Some(target) = save {
                let path = resolve_save_path(&target, &output_format, &report.metadata.candidate_name);
                save_report_to_file(&rendered, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration file: {}\n", config_path.display());
                println!("Embedding model: {}", config.models.embedding_model);
                println!("Chat model: {} at {}", config.models.llm.model, config.models.llm.endpoint);
                println!("API key variable: {}", config.models.llm.api_key_env);
                println!(
                    "Chunking: {} characters, {} overlap",
                    config.retrieval.chunk_size, config.retrieval.chunk_overlap
                );
                let weights = config.scoring.policy.weights();
                println!("\nAggregation policy: {}", config.scoring.policy);
                println!("  Skills: {:.0}%", weights.skill * 100.0);
                println!("  Experience: {:.0}%", weights.experience * 100.0);
                println!("  Education: {:.0}%", weights.education * 100.0);
                println!("  Semantic: {:.0}%", weights.semantic * 100.0);
                println!("  Model: {:.0}%", weights.llm * 100.0);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Build the collaborators and run one evaluation. Blocking: the embedding
/// model load and the model client both do synchronous I/O.
fn run_evaluation(
    config: &Config,
    candidate: CandidateProfile,
    job: JobInput,
    policy: AggregationPolicy,
    use_llm: bool,
) -> Result<(ScoreBreakdown, JobRequirement)> {
    let embedder = embedder_or_unavailable(Model2VecEmbedder::from_config(config));
    let index = index_job_description(
        embedder.clone(),
        &job.description_text(),
        config.retrieval.chunk_size,
        config.retrieval.chunk_overlap,
    );

    let generator: Option<Arc<dyn TextGenerator>> = if use_llm {
        let client = ChatCompletionGenerator::new(&config.models.llm, PromptTemplate::match_analysis())?;
        if !client.has_api_key() {
            warn!(
                "{} is not set; the narrative stage will degrade",
                config.models.llm.api_key_env
            );
        }
        Some(Arc::new(client) as Arc<dyn TextGenerator>)
    } else {
        None
    };

    let engine = MatchEngine::new(embedder, index, generator, policy)?;
    let requirement = engine.job_requirement(&job);
    let breakdown = engine.evaluate(&candidate, &job);

    Ok((breakdown, requirement))
}
