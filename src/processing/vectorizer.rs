//! Projection of free text into an index's vector space

use crate::processing::index::CorpusIndex;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vector::SparseVector;
use log::debug;

/// Query text projected onto the index vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct QueryProjection {
    pub vector: SparseVector,
    /// Distinct query terms that exist in the vocabulary
    pub matched_terms: Vec<String>,
    /// Distinct query terms dropped as out-of-vocabulary
    pub unknown_terms: Vec<String>,
}

/// Vectorizes queries with the exact tokenizer and IDF weights of an index
pub struct QueryVectorizer<'a> {
    index: &'a CorpusIndex,
    processor: TextProcessor,
}

impl<'a> QueryVectorizer<'a> {
    pub fn new(index: &'a CorpusIndex) -> Self {
        Self {
            index,
            processor: TextProcessor::new(),
        }
    }

    pub fn index(&self) -> &'a CorpusIndex {
        self.index
    }

    /// Unit-length TF-IDF vector for `text`, or the zero vector when no term
    /// of `text` is in the vocabulary
    pub fn vectorize(&self, text: &str) -> SparseVector {
        self.project(text).vector
    }

    pub fn project(&self, text: &str) -> QueryProjection {
        let vocabulary = self.index.vocabulary();
        let mut weights = Vec::new();
        let mut matched_terms = Vec::new();
        let mut unknown_terms = Vec::new();

        for (term, tf) in self.processor.term_frequencies(text) {
            match vocabulary.get_full(&term) {
                Some((dim, _, stats)) => {
                    weights.push((dim, tf as f32 * stats.idf));
                    matched_terms.push(term);
                }
                None => unknown_terms.push(term),
            }
        }

        let vector = SparseVector::from_weights(weights)
            .normalized()
            .unwrap_or_else(|err| {
                debug!("Query projects to the zero vector: {}", err);
                SparseVector::zero()
            });

        debug!(
            "Query matched {} vocabulary terms, dropped {} unknown terms",
            matched_terms.len(),
            unknown_terms.len()
        );

        QueryProjection {
            vector,
            matched_terms,
            unknown_terms,
        }
    }
}
