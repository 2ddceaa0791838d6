//! Report structures handed to the output formatters

use crate::processing::analyzer::GapReport;
use crate::processing::index::CorpusIndex;
use crate::processing::ranker::RankingResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub matcher_version: String,
}

impl ReportMetadata {
    pub fn new(processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Summary of the index a ranking was computed against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub corpus_hash: String,
    pub corpus_size: usize,
    pub vocabulary_size: usize,
    pub built_at: DateTime<Utc>,
    pub from_cache: bool,
}

impl IndexSummary {
    pub fn from_index(index: &CorpusIndex, from_cache: bool) -> Self {
        Self {
            corpus_hash: index.corpus_hash().to_string(),
            corpus_size: index.len(),
            vocabulary_size: index.vocabulary_size(),
            built_at: index.built_at(),
            from_cache,
        }
    }
}

/// Best-fit jobs for one profile or resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub metadata: ReportMetadata,
    /// Where the query text came from (a file path or "profile text")
    pub query_source: String,
    pub matched_terms: Vec<String>,
    pub index: IndexSummary,
    pub ranking: RankingResult,
}

/// Skill gap for one job title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub metadata: ReportMetadata,
    pub candidate_source: String,
    pub gap: GapReport,
}

/// Render a [0, 1] score as a whole percentage
pub fn score_percentage(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
