//! CLI interface for the career matcher

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career-matcher")]
#[command(about = "Match skills and resumes against job postings")]
#[command(long_about = "Rank job postings against a profile or resume with TF-IDF cosine similarity, and report skill gaps for a job title")]
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
    /// Build (or reuse) the persisted index for a job corpus
    Index {
        /// Job corpus JSON file
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Rebuild even when a cached index exists
        #[arg(short, long)]
        force: bool,
    },

    /// Rank job postings by similarity to a profile or resume
    Match {
        /// Free-form profile text
        #[arg(short, long, conflicts_with = "resume", required_unless_present = "resume")]
        profile: Option<String>,

        /// Resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Job corpus JSON file
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Number of jobs to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Report missing skills for a job title
    Gap {
        /// Target job title
        #[arg(short, long)]
        title: String,

        /// Comma-separated skills, e.g. "Python, SQL"
        #[arg(long, conflicts_with = "resume", required_unless_present = "resume")]
        skills: Option<String>,

        /// Resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Job title → skills catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show configuration
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

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
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
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_match_requires_profile_or_resume() {
        assert!(Cli::try_parse_from(["career-matcher", "match"]).is_err());
        assert!(Cli::try_parse_from(["career-matcher", "match", "-p", "python", "-r", "cv.pdf"]).is_err());

        let cli = Cli::try_parse_from(["career-matcher", "match", "-p", "I know Python", "-k", "3"]).unwrap();
        match cli.command {
            Commands::Match { profile, top_k, .. } => {
                assert_eq!(profile.as_deref(), Some("I know Python"));
                assert_eq!(top_k, Some(3));
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_gap_arguments() {
        let cli = Cli::try_parse_from([
            "career-matcher", "-v", "gap", "-t", "Data Scientist", "--skills", "Python, SQL",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Gap { ref title, .. } if title == "Data Scientist"));
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "txt"];
        assert!(validate_file_extension(Path::new("cv.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("cv.xyz"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("cv"), &allowed).is_err());
    }
}
