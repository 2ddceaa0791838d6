//! Normalized skill sets and set-based gap computation

use crate::processing::vector::cosine_similarity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Trim and case-fold a skill label
pub fn normalize_skill(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Unordered set of skills keyed by normalized label.
///
/// The display form of the first occurrence is kept for reporting; blank
/// labels are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    labels: IndexMap<String, String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for label in labels {
            set.insert(label.as_ref());
        }
        set
    }

    /// Parse a comma-separated list such as "Python, SQL ,  Excel"
    pub fn parse_list(text: &str) -> Self {
        Self::from_labels(text.split(','))
    }

    /// Returns false when the label is blank or already present
    pub fn insert(&mut self, label: &str) -> bool {
        let key = normalize_skill(label);
        if key.is_empty() || self.labels.contains_key(&key) {
            return false;
        }
        self.labels.insert(key, label.trim().to_string());
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(&normalize_skill(label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Display labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.values().map(String::as_str)
    }

    pub fn normalized(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.labels.values().cloned().collect()
    }

    /// Display labels of `self` whose normalized form is absent from `other`
    pub fn difference(&self, other: &SkillSet) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(key, _)| !other.labels.contains_key(*key))
            .map(|(_, display)| display.clone())
            .collect()
    }

    pub fn intersection(&self, other: &SkillSet) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(key, _)| other.labels.contains_key(*key))
            .map(|(_, display)| display.clone())
            .collect()
    }

    /// Binary indicator vectors over the union of both sets.
    ///
    /// Dimensions follow `self` then the labels only `other` has.
    pub fn indicator_vectors(&self, other: &SkillSet) -> (Vec<f32>, Vec<f32>) {
        let mut union: Vec<&str> = self.normalized().collect();
        union.extend(other.normalized().filter(|key| !self.labels.contains_key(*key)));

        let indicator = |set: &SkillSet| -> Vec<f32> {
            union
                .iter()
                .map(|key| if set.labels.contains_key(*key) { 1.0 } else { 0.0 })
                .collect()
        };

        (indicator(self), indicator(other))
    }

    /// Cosine of the indicator vectors; 0 when either set is empty
    pub fn indicator_similarity(&self, other: &SkillSet) -> f32 {
        let (a, b) = self.indicator_vectors(other);
        cosine_similarity(&a, &b)
    }
}

/// Result of comparing possessed skills with required skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Required skills the candidate lacks, in required order
    pub missing_skills: Vec<String>,
    /// Required skills the candidate has
    pub matched_skills: Vec<String>,
    /// Indicator-vector cosine between possessed and required
    pub skill_similarity: f32,
}

impl SkillGap {
    pub fn compute(possessed: &SkillSet, required: &SkillSet) -> Self {
        Self {
            missing_skills: required.difference(possessed),
            matched_skills: required.intersection(possessed),
            skill_similarity: possessed.indicator_similarity(required),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalization_dedupes_labels() {
        let set = SkillSet::from_labels(["Python", " python ", "SQL", "", "  "]);

        assert_eq!(set.len(), 2);
        assert!(set.contains("PYTHON"));
        assert_eq!(set.to_vec(), vec!["Python", "SQL"]);
    }

    #[test]
    fn test_parse_list_trims_entries() {
        let set = SkillSet::parse_list("Python, SQL ,  Excel,,");
        assert_eq!(set.to_vec(), vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn test_missing_skills_ignore_case_and_whitespace() {
        let possessed = SkillSet::from_labels(["python", "SQL "]);
        let required = SkillSet::from_labels(["Python", "Leadership"]);

        let gap = SkillGap::compute(&possessed, &required);

        assert_eq!(gap.missing_skills, vec!["Leadership"]);
        assert_eq!(gap.matched_skills, vec!["Python"]);
        assert!(gap.missing_skills.iter().all(|skill| !possessed.contains(skill)));
    }

    #[test]
    fn test_indicator_similarity() {
        let possessed = SkillSet::from_labels(["python", "sql"]);
        let required = SkillSet::from_labels(["Python", "Leadership"]);

        // One shared skill out of two on each side: 1 / (sqrt(2) * sqrt(2))
        assert_relative_eq!(possessed.indicator_similarity(&required), 0.5, epsilon = 1e-6);
        assert_relative_eq!(required.indicator_similarity(&required), 1.0, epsilon = 1e-6);
        assert_eq!(SkillSet::new().indicator_similarity(&required), 0.0);
    }

    #[test]
    fn test_indicator_vectors_cover_union() {
        let a = SkillSet::from_labels(["rust", "go"]);
        let b = SkillSet::from_labels(["go", "sql"]);

        let (va, vb) = a.indicator_vectors(&b);

        assert_eq!(va, vec![1.0, 1.0, 0.0]);
        assert_eq!(vb, vec![0.0, 1.0, 1.0]);
    }
}
