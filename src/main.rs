//! Career matcher: job matching and skill gap analysis from the command line

use anyhow::Context;
use clap::Parser;
use career_matcher::cli::{self, Cli, Commands, ConfigAction};
use career_matcher::config::{Config, OutputFormat};
use career_matcher::error::{CareerMatcherError, Result};
use career_matcher::input::InputManager;
use career_matcher::output::formatter::{save_report_to_file, ReportGenerator};
use career_matcher::output::report::{IndexSummary, MatchReport, ReportMetadata, SkillGapReport};
use career_matcher::processing::analyzer::{CandidateProfile, GapAnalyzer};
use career_matcher::processing::catalog::{load_job_skill_catalog, JobSkillCatalog};
use career_matcher::processing::document::load_job_records;
use career_matcher::processing::ranker::SimilarityRanker;
use career_matcher::processing::store::{IndexOrigin, IndexStore, LoadedIndex};
use career_matcher::processing::vectorizer::QueryVectorizer;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

const RESUME_EXTENSIONS: [&str; 5] = ["pdf", "docx", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from(path),
        Some(path) => {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match command {
        Commands::Index { corpus, force } => {
            let corpus_path = corpus.unwrap_or_else(|| config.data.corpus_path.clone());
            let loaded = load_index(&config, &corpus_path, force).await?;

            match loaded.origin {
                IndexOrigin::Cached => println!("✅ Index is up to date"),
                IndexOrigin::Built => println!("✅ Index built"),
            }
            println!("📁 Location: {}", loaded.path.display());
            println!("💼 Job postings: {}", loaded.index.len());
            println!("🔤 Vocabulary: {} terms", loaded.index.vocabulary_size());
            println!("🔑 Corpus hash: {}", loaded.index.corpus_hash());
        }

        Commands::Match {
            profile,
            resume,
            corpus,
            top_k,
            output,
            detailed,
            save,
        } => {
            let start = Instant::now();
            let output_format = resolve_output_format(output.as_deref(), &config)?;
            let corpus_path = corpus.unwrap_or_else(|| config.data.corpus_path.clone());

            let (query_text, query_source) = match (profile, resume) {
                (Some(text), _) => (text, "profile text".to_string()),
                (None, Some(path)) => {
                    let text = read_resume(&path).await?;
                    (text, path.display().to_string())
                }
                (None, None) => {
                    return Err(CareerMatcherError::InvalidInput(
                        "either --profile or --resume is required".to_string(),
                    )
                    .into())
                }
            };

            let loaded = load_index(&config, &corpus_path, false).await?;
            let index = &loaded.index;
            match index.ensure_not_empty() {
                Err(e) if e.is_recoverable() => warn!("{}", e),
                Err(e) => return Err(e.into()),
                Ok(()) => {}
            }

            let projection = QueryVectorizer::new(index).project(&query_text);
            let ranking = SimilarityRanker::new(index)
                .with_top_k(top_k.unwrap_or(config.matching.top_k))
                .with_min_score(config.matching.min_score)
                .rank(&projection.vector);
            info!("Ranked {} jobs for {}", ranking.len(), query_source);

            let report = MatchReport {
                metadata: ReportMetadata::new(start.elapsed().as_millis() as u64),
                query_source,
                matched_terms: projection.matched_terms,
                index: IndexSummary::from_index(index, loaded.origin == IndexOrigin::Cached),
                ranking,
            };

            let detailed = detailed || config.output.detailed;
            let generator = ReportGenerator::with_options(config.output.color_output, detailed);
            println!("{}", generator.match_report(&report, output_format)?);

            if let Some(path) = save {
                let plain = ReportGenerator::with_options(false, detailed);
                save_report_to_file(&plain.match_report(&report, save_format(&path, output_format))?, &path)?;
                println!("💾 Saved report to {}", path.display());
            }
        }

        Commands::Gap {
            title,
            skills,
            resume,
            catalog,
            output,
            detailed,
            save,
        } => {
            let start = Instant::now();
            let output_format = resolve_output_format(output.as_deref(), &config)?;

            let catalog_path = catalog.unwrap_or_else(|| config.data.skill_catalog_path.clone());
            let job_catalog = if catalog_path.exists() {
                load_job_skill_catalog(&catalog_path).await?
            } else {
                warn!(
                    "Skill catalog {} not found; every title uses the default requirements",
                    catalog_path.display()
                );
                JobSkillCatalog::default()
            };
            let analyzer = GapAnalyzer::from_config(&config.skills, job_catalog)?;

            let (candidate, candidate_source) = match (skills, resume) {
                (Some(list), _) => (CandidateProfile::TypedSkills(list), "typed skills".to_string()),
                (None, Some(path)) => {
                    validate_resume_path(&path)?;
                    let text = InputManager::new().extract_text_or_empty(&path).await?;
                    (CandidateProfile::ResumeText(text), path.display().to_string())
                }
                (None, None) => {
                    return Err(CareerMatcherError::InvalidInput(
                        "either --skills or --resume is required".to_string(),
                    )
                    .into())
                }
            };

            let gap = analyzer.analyze(&title, &candidate);
            let report = SkillGapReport {
                metadata: ReportMetadata::new(start.elapsed().as_millis() as u64),
                candidate_source,
                gap,
            };

            let detailed = detailed || config.output.detailed;
            let generator = ReportGenerator::with_options(config.output.color_output, detailed);
            println!("{}", generator.gap_report(&report, output_format)?);

            if let Some(path) = save {
                let plain = ReportGenerator::with_options(false, detailed);
                save_report_to_file(&plain.gap_report(&report, save_format(&path, output_format))?, &path)?;
                println!("💾 Saved report to {}", path.display());
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Corpus: {}", config.data.corpus_path.display());
                println!("Skill catalog: {}", config.data.skill_catalog_path.display());
                println!("Index directory: {}", config.index_dir().display());
                println!("\nMatching:");
                println!("  Top K: {}", config.matching.top_k);
                println!("  Minimum score: {:.2}", config.matching.min_score);
                println!("\nSkills:");
                println!("  Known skills: {}", config.skills.known_skills.len());
                println!("  ATS checklist: {}", config.skills.keyword_checklist.join(", "));
                println!("  Default requirements: {}", config.skills.default_required_skills.join(", "));
                println!("  Course links: {} (fallback {})", config.skills.course_links.len(), config.skills.fallback_course_url);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                match &config_path {
                    Some(path) => default_config.save_to(path)?,
                    None => default_config.save()?,
                }
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

async fn load_index(config: &Config, corpus_path: &Path, force: bool) -> anyhow::Result<LoadedIndex> {
    let records = load_job_records(corpus_path)
        .await
        .with_context(|| format!("loading job corpus from {}", corpus_path.display()))?;

    let store = IndexStore::new(config.index_dir());
    let loaded = store
        .load_or_build(&records, force)
        .await
        .with_context(|| format!("preparing index in {}", config.index_dir().display()))?;
    Ok(loaded)
}

fn validate_resume_path(path: &Path) -> Result<()> {
    cli::validate_file_extension(path, &RESUME_EXTENSIONS)
        .map_err(|e| CareerMatcherError::InvalidInput(format!("Resume file: {}", e)))
}

/// Read resume text for ranking; unusable documents degrade to empty text
async fn read_resume(path: &Path) -> Result<String> {
    validate_resume_path(path)?;
    InputManager::new().extract_text_or_empty(path).await
}

fn resolve_output_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(value) => cli::parse_output_format(value).map_err(CareerMatcherError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Saved reports follow the file extension when it names JSON
fn save_format(path: &Path, requested: OutputFormat) -> OutputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
        _ => requested,
    }
}
