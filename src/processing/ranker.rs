//! Top-K ranking of indexed job postings by cosine similarity

use crate::processing::index::CorpusIndex;
use crate::processing::vector::SparseVector;
use crate::processing::vectorizer::QueryVectorizer;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: usize = 10;

/// One ranked job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    pub rank: usize,
    pub id: String,
    /// TF-IDF cosine similarity in [0, 1]
    pub score: f32,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub job_posting_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub jobs: Vec<RankedJob>,
    pub corpus_size: usize,
    pub top_k: usize,
}

impl RankingResult {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn top(&self) -> Option<&RankedJob> {
        self.jobs.first()
    }

    /// (identifier, score) pairs in rank order
    pub fn scores(&self) -> Vec<(&str, f32)> {
        self.jobs.iter().map(|job| (job.id.as_str(), job.score)).collect()
    }
}

/// Scores a query vector against every document of an index.
///
/// A zero query vector ranks nothing: the result is empty rather than a list
/// of zero scores.
pub struct SimilarityRanker<'a> {
    index: &'a CorpusIndex,
    top_k: usize,
    min_score: f32,
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(index: &'a CorpusIndex) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOP_K,
            min_score: 0.0,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Drop results scoring below `min_score`
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    /// Similarity of `query` to every document, in corpus order
    pub fn score_all(&self, query: &SparseVector) -> Vec<f32> {
        if query.is_zero() {
            return vec![0.0; self.index.len()];
        }

        // One dense copy of the query keeps the pass linear in the corpus non-zeros
        let dense_query = query.to_dense(self.index.vocabulary_size());
        self.index
            .documents()
            .iter()
            .map(|doc| doc.vector.dot_dense(&dense_query).clamp(0.0, 1.0))
            .collect()
    }

    pub fn rank(&self, query: &SparseVector) -> RankingResult {
        let mut result = RankingResult {
            jobs: Vec::new(),
            corpus_size: self.index.len(),
            top_k: self.top_k,
        };

        if query.is_zero() || self.index.is_empty() || self.top_k == 0 {
            debug!("Nothing to rank (zero query or empty corpus)");
            return result;
        }

        let mut scored: Vec<(usize, f32)> = self
            .score_all(query)
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score >= self.min_score)
            .collect();

        // Stable: equal scores keep corpus order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.top_k);

        result.jobs = scored
            .into_iter()
            .enumerate()
            .filter_map(|(rank, (position, score))| {
                self.index.document(position).map(|doc| RankedJob {
                    rank: rank + 1,
                    id: doc.id.clone(),
                    score,
                    title: doc.title.clone(),
                    company_name: doc.company_name.clone(),
                    location: doc.location.clone(),
                    job_posting_url: doc.job_posting_url.clone(),
                })
            })
            .collect();

        debug!(
            "Ranked {} of {} job postings",
            result.jobs.len(),
            result.corpus_size
        );
        result
    }

    /// Vectorize `text` against the same index and rank it
    pub fn rank_text(&self, text: &str) -> RankingResult {
        let query = QueryVectorizer::new(self.index).vectorize(text);
        self.rank(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::JobRecord;

    fn corpus() -> Vec<JobRecord> {
        vec![
            JobRecord::new("1", "Data Scientist", "Python SQL machine learning", ""),
            JobRecord::new("2", "Frontend Developer", "JavaScript React CSS", ""),
            JobRecord::new("3", "Data Analyst", "SQL Excel Tableau", ""),
            JobRecord::new("4", "Backend Developer", "Python Django SQL", ""),
        ]
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let index = CorpusIndex::build(&corpus());
        let result = SimilarityRanker::new(&index).rank_text("Python machine learning");

        assert_eq!(result.top().unwrap().id, "1");
        for pair in result.jobs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(result.jobs.iter().all(|job| (0.0..=1.0).contains(&job.score)));
        assert_eq!(result.jobs[0].rank, 1);
    }

    #[test]
    fn test_top_k_caps_results() {
        let index = CorpusIndex::build(&corpus());
        let result = SimilarityRanker::new(&index).with_top_k(2).rank_text("sql");

        assert_eq!(result.len(), 2);
        assert_eq!(result.top_k, 2);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let records = vec![
            JobRecord::new("a", "", "rust", ""),
            JobRecord::new("b", "", "go", ""),
            JobRecord::new("c", "", "rust", ""),
        ];
        let index = CorpusIndex::build(&records);
        let result = SimilarityRanker::new(&index).rank_text("rust");

        let ids: Vec<&str> = result.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(result.jobs[2].score, 0.0);
    }

    #[test]
    fn test_min_score_filters_results() {
        let index = CorpusIndex::build(&corpus());
        let result = SimilarityRanker::new(&index)
            .with_min_score(0.01)
            .rank_text("javascript react");

        assert_eq!(result.len(), 1);
        assert_eq!(result.top().unwrap().id, "2");
    }

    #[test]
    fn test_zero_query_ranks_nothing() {
        let index = CorpusIndex::build(&corpus());
        let ranker = SimilarityRanker::new(&index);

        assert!(ranker.rank(&SparseVector::zero()).is_empty());
        assert!(ranker.rank_text("the of and").is_empty());
        assert!(ranker
            .score_all(&SparseVector::zero())
            .iter()
            .all(|&score| score == 0.0));
    }

    #[test]
    fn test_empty_corpus_ranks_nothing() {
        let index = CorpusIndex::build(&[]);
        let result = SimilarityRanker::new(&index).rank_text("python");

        assert!(result.is_empty());
        assert_eq!(result.corpus_size, 0);
    }
}
