//! Configuration management for the career matcher

use crate::error::{CareerMatcherError, Result};
use crate::processing::catalog::{DEFAULT_REQUIRED_SKILLS, FALLBACK_COURSE_URL};
use crate::processing::ranker::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub matching: MatchingConfig,
    pub skills: SkillsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub corpus_path: PathBuf,
    pub skill_catalog_path: PathBuf,
    pub index_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub top_k: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Controlled vocabulary for reading skills out of resumes
    pub known_skills: Vec<String>,
    /// Keywords behind the ATS coverage score; must not be empty
    pub keyword_checklist: Vec<String>,
    /// Required skills for titles missing from the catalog
    pub default_required_skills: Vec<String>,
    pub fallback_course_url: String,
    pub course_links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

/// Skills recognised in resume text, each with a course search link
pub const KNOWN_SKILLS: [&str; 22] = [
    "Python", "Machine Learning", "Flask", "API Development", "JavaScript", "R",
    "Deep Learning", "Data Visualization", "SQL", "HTML", "CSS", "React", "Node.js",
    "Project Management", "Agile", "Leadership", "Communication", "User Research",
    "Wireframing", "Prototyping", "Figma", "Adobe XD",
];

pub const KEYWORD_CHECKLIST: [&str; 8] = [
    "Python", "Data Analysis", "Machine Learning", "NLP",
    "Deep Learning", "SQL", "API Development", "Team Collaboration",
];

const COURSE_SEARCH_URL: &str = "https://www.coursera.org/courses?query=";

fn course_search_url(skill: &str) -> String {
    format!("{}{}", COURSE_SEARCH_URL, skill.to_lowercase().replace(' ', "%20"))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        let index_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".career-matcher")
            .join("index");

        let known_skills = strings(&KNOWN_SKILLS);
        let course_links = KNOWN_SKILLS
            .iter()
            .map(|skill| (skill.to_string(), course_search_url(skill)))
            .collect();

        Self {
            data: DataConfig {
                corpus_path: PathBuf::from("data/jobs.json"),
                skill_catalog_path: PathBuf::from("data/job_skills.json"),
                index_dir,
            },
            matching: MatchingConfig {
                top_k: DEFAULT_TOP_K,
                min_score: 0.0,
            },
            skills: SkillsConfig {
                known_skills,
                keyword_checklist: strings(&KEYWORD_CHECKLIST),
                default_required_skills: strings(&DEFAULT_REQUIRED_SKILLS),
                fallback_course_url: FALLBACK_COURSE_URL.to_string(),
                course_links,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CareerMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CareerMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-matcher")
            .join("config.toml")
    }

    /// Reject settings that would make every computation fail
    pub fn validate(&self) -> Result<()> {
        if self.skills.keyword_checklist.iter().all(|k| k.trim().is_empty()) {
            return Err(CareerMatcherError::EmptyChecklist);
        }
        if self.matching.top_k == 0 {
            return Err(CareerMatcherError::Configuration(
                "matching.top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matching.min_score) {
            return Err(CareerMatcherError::Configuration(format!(
                "matching.min_score must be within [0, 1], got {}",
                self.matching.min_score
            )));
        }
        Ok(())
    }

    pub fn index_dir(&self) -> &PathBuf {
        &self.data.index_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.matching.top_k, 10);
        assert_eq!(config.skills.known_skills.len(), 22);
        assert_eq!(config.skills.keyword_checklist.len(), 8);
        assert_eq!(config.skills.default_required_skills.len(), 3);
    }

    #[test]
    fn test_every_known_skill_has_a_course_link() {
        let skills = Config::default().skills;

        assert_eq!(skills.course_links.len(), skills.known_skills.len());
        assert_eq!(skills.course_links["Flask"], "https://www.coursera.org/courses?query=flask");
        assert_eq!(skills.course_links["Adobe XD"], "https://www.coursera.org/courses?query=adobe%20xd");
        assert_eq!(skills.course_links["Node.js"], "https://www.coursera.org/courses?query=node.js");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.matching.top_k = 3;
        config.output.format = OutputFormat::Json;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.matching.top_k, 3);
        assert_eq!(loaded.output.format, OutputFormat::Json);
        assert_eq!(loaded.skills.course_links, config.skills.course_links);
    }

    #[test]
    fn test_empty_checklist_is_invalid() {
        let mut config = Config::default();
        config.skills.keyword_checklist = vec!["  ".to_string()];

        assert!(matches!(config.validate(), Err(CareerMatcherError::EmptyChecklist)));
    }

    #[test]
    fn test_invalid_matching_settings() {
        let mut config = Config::default();
        config.matching.top_k = 0;
        assert!(matches!(config.validate(), Err(CareerMatcherError::Configuration(_))));

        let mut config = Config::default();
        config.matching.min_score = 1.5;
        assert!(config.validate().is_err());
    }
}
