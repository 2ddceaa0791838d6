//! Lookup catalogs: job title → required skills, known skills, course links

use crate::error::{CareerMatcherError, Result};
use crate::processing::skills::{normalize_skill, SkillSet};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::fs;

/// Required skills assumed for any title missing from the catalog
pub const DEFAULT_REQUIRED_SKILLS: [&str; 3] = ["Communication", "Project Management", "Leadership"];

pub const FALLBACK_COURSE_URL: &str = "https://www.coursera.org";

/// One row of the job-title catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSkillRecord {
    pub job_title: String,
    /// Comma-separated skill labels
    #[serde(default)]
    pub required_skills: String,
}

/// Where a required skill set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementSource {
    Catalog,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequiredSkills {
    pub skills: SkillSet,
    pub source: RequirementSource,
}

/// Maps job titles to required skills.
///
/// Titles match case-insensitively after trimming. Unknown titles fall back to
/// the default skill set through [`JobSkillCatalog::required_skills_for`].
#[derive(Debug, Clone)]
pub struct JobSkillCatalog {
    entries: HashMap<String, SkillSet>,
    default_skills: SkillSet,
}

impl Default for JobSkillCatalog {
    fn default() -> Self {
        Self::new(SkillSet::from_labels(DEFAULT_REQUIRED_SKILLS))
    }
}

impl JobSkillCatalog {
    pub fn new(default_skills: SkillSet) -> Self {
        Self {
            entries: HashMap::new(),
            default_skills,
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = JobSkillRecord>,
    {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(&record.job_title, &record.required_skills);
        }
        catalog
    }

    pub fn with_default_skills(mut self, default_skills: SkillSet) -> Self {
        self.default_skills = default_skills;
        self
    }

    /// Parse a JSON array of `{job_title, required_skills}` rows
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<JobSkillRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Later rows for the same title replace earlier ones
    pub fn insert(&mut self, job_title: &str, required_skills: &str) {
        let key = normalize_skill(job_title);
        if key.is_empty() {
            debug!("Skipping catalog row with a blank job title");
            return;
        }
        self.entries.insert(key, SkillSet::parse_list(required_skills));
    }

    pub fn lookup(&self, job_title: &str) -> Result<&SkillSet> {
        self.entries
            .get(&normalize_skill(job_title))
            .ok_or_else(|| CareerMatcherError::UnknownJobTitle(job_title.trim().to_string()))
    }

    pub fn required_skills_for(&self, job_title: &str) -> RequiredSkills {
        match self.lookup(job_title) {
            Ok(skills) => RequiredSkills {
                skills: skills.clone(),
                source: RequirementSource::Catalog,
            },
            Err(err) => {
                warn!("{}; using default required skills", err);
                RequiredSkills {
                    skills: self.default_skills.clone(),
                    source: RequirementSource::Default,
                }
            }
        }
    }

    pub fn default_skills(&self) -> &SkillSet {
        &self.default_skills
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read a job-title catalog from a JSON file
pub async fn load_job_skill_catalog(path: &Path) -> Result<JobSkillCatalog> {
    if !path.exists() {
        return Err(CareerMatcherError::InvalidInput(format!(
            "Skill catalog does not exist: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).await?;
    let catalog = JobSkillCatalog::from_json(&content)?;
    info!("Loaded {} job titles from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Controlled vocabulary of known skills, used to read skills out of resume text
pub struct SkillCatalog {
    skills: Vec<String>,
    matcher: AhoCorasick,
}

impl SkillCatalog {
    pub fn new<I, S>(skills: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let skills = SkillSet::from_labels(skills).to_vec();
        let patterns: Vec<String> = skills.iter().map(|s| normalize_skill(s)).collect();

        // Standard match kind so overlapping matches ("java" in "javascript") all report
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| CareerMatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { skills, matcher })
    }

    /// Catalog skills contained in `text` (case-insensitive substring), in catalog order
    pub fn extract_from_text(&self, text: &str) -> SkillSet {
        let haystack = text.to_lowercase();
        let mut found = vec![false; self.skills.len()];
        for mat in self.matcher.find_overlapping_iter(&haystack) {
            found[mat.pattern().as_usize()] = true;
        }

        let possessed = SkillSet::from_labels(
            self.skills
                .iter()
                .zip(found)
                .filter(|(_, hit)| *hit)
                .map(|(skill, _)| skill),
        );
        debug!("Found {} catalog skills in {} characters of text", possessed.len(), text.len());
        possessed
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// A course link suggested for one missing skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub skill: String,
    pub url: String,
    pub is_fallback: bool,
}

/// Skill → course URL lookup with a fallback for unlisted skills
#[derive(Debug, Clone)]
pub struct CourseLinks {
    links: HashMap<String, String>,
    fallback_url: String,
}

impl Default for CourseLinks {
    fn default() -> Self {
        Self::new(FALLBACK_COURSE_URL)
    }
}

impl CourseLinks {
    pub fn new(fallback_url: impl Into<String>) -> Self {
        Self {
            links: HashMap::new(),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn from_map(links: &BTreeMap<String, String>, fallback_url: impl Into<String>) -> Self {
        let mut course_links = Self::new(fallback_url);
        for (skill, url) in links {
            course_links.insert(skill, url);
        }
        course_links
    }

    pub fn insert(&mut self, skill: &str, url: &str) {
        self.links.insert(normalize_skill(skill), url.trim().to_string());
    }

    pub fn link_for(&self, skill: &str) -> &str {
        self.links
            .get(&normalize_skill(skill))
            .map(String::as_str)
            .unwrap_or(&self.fallback_url)
    }

    pub fn recommend(&self, skill: &str) -> CourseRecommendation {
        let listed = self.links.get(&normalize_skill(skill));
        CourseRecommendation {
            skill: skill.to_string(),
            url: listed.cloned().unwrap_or_else(|| self.fallback_url.clone()),
            is_fallback: listed.is_none(),
        }
    }

    pub fn recommendations(&self, skills: &[String]) -> Vec<CourseRecommendation> {
        skills.iter().map(|skill| self.recommend(skill)).collect()
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }
}
