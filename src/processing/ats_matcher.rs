//! ATS (Applicant Tracking System) keyword checklist scoring

use crate::error::{CareerMatcherError, Result};
use crate::processing::skills::{normalize_skill, SkillSet};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

/// Coverage of a keyword checklist by one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    /// Percentage of checklist keywords found, in [0, 100]
    pub score: f32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub checklist_size: usize,
}

/// Fixed keyword checklist matched by case-insensitive substring.
///
/// Construction fails with `EmptyChecklist` when no usable keyword remains,
/// so scoring never divides by zero.
pub struct KeywordChecklist {
    keywords: Vec<String>,
    matcher: AhoCorasick,
}

impl KeywordChecklist {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = SkillSet::from_labels(keywords).to_vec();
        if keywords.is_empty() {
            return Err(CareerMatcherError::EmptyChecklist);
        }

        let patterns: Vec<String> = keywords.iter().map(|k| normalize_skill(k)).collect();
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| CareerMatcherError::Processing(format!("Failed to build ATS matcher: {}", e)))?;

        Ok(Self { keywords, matcher })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn score(&self, text: &str) -> AtsScore {
        let haystack = text.to_lowercase();
        let mut found = vec![false; self.keywords.len()];
        for mat in self.matcher.find_overlapping_iter(&haystack) {
            found[mat.pattern().as_usize()] = true;
        }

        let (matched, missing): (Vec<_>, Vec<_>) = self
            .keywords
            .iter()
            .zip(found)
            .partition(|(_, hit)| *hit);

        let matched_keywords: Vec<String> = matched.into_iter().map(|(k, _)| k.clone()).collect();
        let missing_keywords: Vec<String> = missing.into_iter().map(|(k, _)| k.clone()).collect();
        let score = 100.0 * matched_keywords.len() as f32 / self.keywords.len() as f32;

        AtsScore {
            score,
            matched_keywords,
            missing_keywords,
            checklist_size: self.keywords.len(),
        }
    }
}

/// One-shot checklist scoring
pub fn ats_score<S: AsRef<str>>(text: &str, checklist: &[S]) -> Result<AtsScore> {
    Ok(KeywordChecklist::new(checklist)?.score(text))
}
