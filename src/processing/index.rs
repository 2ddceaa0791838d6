//! Corpus indexing: vocabulary, IDF weights and unit-length document vectors

use crate::error::{CareerMatcherError, Result};
use crate::processing::document::JobRecord;
use crate::processing::text_processor::{TextProcessor, TOKENIZER_VERSION};
use crate::processing::vector::SparseVector;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Corpus-level statistics for one vocabulary term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermStats {
    pub document_frequency: usize,
    pub idf: f32,
}

/// A job posting after indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub job_posting_url: Option<String>,
    pub vector: SparseVector,
}

/// Immutable TF-IDF index over a static corpus.
///
/// The vocabulary position of a term is its vector dimension. Dimensions are
/// assigned in first-seen order across the corpus, so rebuilding from the same
/// records always yields the same layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusIndex {
    tokenizer_version: u32,
    corpus_hash: String,
    vocabulary: IndexMap<String, TermStats>,
    documents: Vec<IndexedDocument>,
    built_at: DateTime<Utc>,
}

impl CorpusIndex {
    pub fn build(records: &[JobRecord]) -> Self {
        Self::build_with(records, &TextProcessor::new())
    }

    pub fn build_with(records: &[JobRecord], processor: &TextProcessor) -> Self {
        let corpus_hash = corpus_fingerprint(records);
        if records.is_empty() {
            warn!("Indexing an empty corpus; every ranking will be empty");
        }

        let frequencies: Vec<IndexMap<String, usize>> = records
            .iter()
            .map(|record| processor.term_frequencies(&record.combined_text()))
            .collect();

        let mut document_frequency: IndexMap<String, usize> = IndexMap::new();
        for counts in &frequencies {
            for term in counts.keys() {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = records.len() as f32;
        let vocabulary: IndexMap<String, TermStats> = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let idf = smoothed_idf(n, df as f32);
                (term, TermStats { document_frequency: df, idf })
            })
            .collect();

        let documents = records
            .iter()
            .zip(&frequencies)
            .map(|(record, counts)| {
                let weights = counts.iter().filter_map(|(term, &tf)| {
                    vocabulary
                        .get_full(term)
                        .map(|(dim, _, stats)| (dim, tf as f32 * stats.idf))
                });
                let vector = SparseVector::from_weights(weights)
                    .normalized()
                    .unwrap_or_else(|_| {
                        debug!("Job {} has no indexable terms; keeping a zero vector", record.id);
                        SparseVector::zero()
                    });

                IndexedDocument {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    company_name: record.company_name.clone(),
                    location: record.location.clone(),
                    job_posting_url: record.job_posting_url.clone(),
                    vector,
                }
            })
            .collect();

        info!(
            "Indexed {} job postings with a vocabulary of {} terms",
            records.len(),
            vocabulary.len()
        );

        Self {
            tokenizer_version: processor.version(),
            corpus_hash,
            vocabulary,
            documents,
            built_at: Utc::now(),
        }
    }

    /// Fails with `EmptyCorpus` when there is nothing to rank against
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.documents.is_empty() {
            Err(CareerMatcherError::EmptyCorpus(format!(
                "index {} contains no job postings",
                self.short_hash()
            )))
        } else {
            Ok(())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    pub fn term_at(&self, dim: usize) -> Option<&str> {
        self.vocabulary.get_index(dim).map(|(term, _)| term.as_str())
    }

    pub fn term_stats(&self, term: &str) -> Option<&TermStats> {
        self.vocabulary.get(term)
    }

    /// Vocabulary terms in dimension order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    pub(crate) fn vocabulary(&self) -> &IndexMap<String, TermStats> {
        &self.vocabulary
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn document(&self, position: usize) -> Option<&IndexedDocument> {
        self.documents.get(position)
    }

    pub fn corpus_hash(&self) -> &str {
        &self.corpus_hash
    }

    pub fn short_hash(&self) -> &str {
        &self.corpus_hash[..self.corpus_hash.len().min(12)]
    }

    pub fn tokenizer_version(&self) -> u32 {
        self.tokenizer_version
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Total non-zero weights across all document vectors
    pub fn total_nnz(&self) -> usize {
        self.documents.iter().map(|d| d.vector.nnz()).sum()
    }
}

/// `ln((1 + n) / (1 + df)) + 1`: finite for df = 0 and positive when a term
/// occurs in every document
pub fn smoothed_idf(n: f32, df: f32) -> f32 {
    ((1.0 + n) / (1.0 + df)).ln() + 1.0
}

/// SHA-256 over the tokenizer version and every field that reaches the index
pub fn corpus_fingerprint(records: &[JobRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(TOKENIZER_VERSION.to_le_bytes());
    hasher.update((records.len() as u64).to_le_bytes());

    for record in records {
        for field in [&record.id, &record.title, &record.description, &record.skills_text] {
            hash_field(&mut hasher, Some(field));
        }
        for field in [&record.company_name, &record.location, &record.job_posting_url] {
            hash_field(&mut hasher, field.as_ref());
        }
    }

    format!("{:x}", hasher.finalize())
}

fn hash_field(hasher: &mut Sha256, field: Option<&String>) {
    match field {
        Some(value) => {
            hasher.update([1u8]);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}
