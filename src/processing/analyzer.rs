//! Skill gap analysis combining the catalogs, set comparison and ATS scoring

use crate::config::SkillsConfig;
use crate::error::Result;
use crate::processing::ats_matcher::{AtsScore, KeywordChecklist};
use crate::processing::catalog::{
    CourseLinks, CourseRecommendation, JobSkillCatalog, RequirementSource, SkillCatalog,
};
use crate::processing::skills::{SkillGap, SkillSet};
use log::info;
use serde::{Deserialize, Serialize};

/// How the candidate's skills were supplied
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateProfile {
    /// Comma-separated skills typed by the user, accepted as free text
    TypedSkills(String),
    /// Resume text; skills are read against the known-skills catalog
    ResumeText(String),
}

impl CandidateProfile {
    pub fn text(&self) -> &str {
        match self {
            CandidateProfile::TypedSkills(text) | CandidateProfile::ResumeText(text) => text,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CandidateProfile::TypedSkills(_) => "typed skills",
            CandidateProfile::ResumeText(_) => "resume",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub job_title: String,
    pub requirement_source: RequirementSource,
    pub possessed_skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Binary indicator cosine between possessed and required, in [0, 1]
    pub skill_similarity: f32,
    pub ats: AtsScore,
    pub course_recommendations: Vec<CourseRecommendation>,
}

impl GapReport {
    pub fn ats_score(&self) -> f32 {
        self.ats.score
    }

    pub fn has_gaps(&self) -> bool {
        !self.missing_skills.is_empty()
    }
}

pub struct GapAnalyzer {
    job_catalog: JobSkillCatalog,
    skill_catalog: SkillCatalog,
    checklist: KeywordChecklist,
    course_links: CourseLinks,
}

impl GapAnalyzer {
    pub fn new(
        job_catalog: JobSkillCatalog,
        skill_catalog: SkillCatalog,
        checklist: KeywordChecklist,
        course_links: CourseLinks,
    ) -> Self {
        Self {
            job_catalog,
            skill_catalog,
            checklist,
            course_links,
        }
    }

    /// Build from the `[skills]` configuration section. Fails with
    /// `EmptyChecklist` when the configured checklist has no keywords.
    pub fn from_config(config: &SkillsConfig, job_catalog: JobSkillCatalog) -> Result<Self> {
        let checklist = KeywordChecklist::new(&config.keyword_checklist)?;
        let skill_catalog = SkillCatalog::new(&config.known_skills)?;
        let course_links = CourseLinks::from_map(&config.course_links, config.fallback_course_url.clone());
        let job_catalog =
            job_catalog.with_default_skills(SkillSet::from_labels(&config.default_required_skills));

        Ok(Self::new(job_catalog, skill_catalog, checklist, course_links))
    }

    pub fn possessed_skills(&self, candidate: &CandidateProfile) -> SkillSet {
        match candidate {
            CandidateProfile::TypedSkills(text) => SkillSet::parse_list(text),
            CandidateProfile::ResumeText(text) => self.skill_catalog.extract_from_text(text),
        }
    }

    pub fn analyze(&self, job_title: &str, candidate: &CandidateProfile) -> GapReport {
        let required = self.job_catalog.required_skills_for(job_title);
        let possessed = self.possessed_skills(candidate);
        let gap = SkillGap::compute(&possessed, &required.skills);
        let ats = self.checklist.score(candidate.text());
        let course_recommendations = self.course_links.recommendations(&gap.missing_skills);

        info!(
            "Gap analysis for '{}' from {}: {} of {} required skills missing, ATS {:.0}%",
            job_title.trim(),
            candidate.kind(),
            gap.missing_skills.len(),
            required.skills.len(),
            ats.score
        );

        GapReport {
            job_title: job_title.trim().to_string(),
            requirement_source: required.source,
            possessed_skills: possessed.to_vec(),
            required_skills: required.skills.to_vec(),
            matched_skills: gap.matched_skills,
            missing_skills: gap.missing_skills,
            skill_similarity: gap.skill_similarity,
            ats,
            course_recommendations,
        }
    }

    pub fn job_catalog(&self) -> &JobSkillCatalog {
        &self.job_catalog
    }

    pub fn skill_catalog(&self) -> &SkillCatalog {
        &self.skill_catalog
    }

    pub fn checklist(&self) -> &KeywordChecklist {
        &self.checklist
    }
}
