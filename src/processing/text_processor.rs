//! Text normalization and tokenization shared by indexing and querying

use indexmap::IndexMap;
use std::collections::HashSet;

/// Bumped whenever tokenization rules change. Persisted indexes built with a
/// different version are rejected on load.
pub const TOKENIZER_VERSION: u32 = 1;

/// Tokens shorter than this (in characters) are discarded.
pub const MIN_TOKEN_CHARS: usize = 2;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Tokenizer used for both the corpus and incoming queries.
///
/// The rules are fixed: lower-case, split on every non-alphanumeric character,
/// drop short tokens and stop words. Every character is accepted, so
/// tokenization cannot fail.
#[derive(Debug, Clone)]
pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn version(&self) -> u32 {
        TOKENIZER_VERSION
    }

    /// Tokenize text into normalized terms, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    /// Count term occurrences, keyed in first-seen order
    pub fn term_frequencies(&self, text: &str) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert_eq!(tokens, vec!["rust", "programming", "language", "awesome"]);
    }

    #[test]
    fn test_splits_on_non_alphanumeric() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("node.js/TypeScript, CI-CD;k8s");

        assert_eq!(tokens, vec!["node", "js", "typescript", "ci", "cd", "k8s"]);
    }

    #[test]
    fn test_short_tokens_and_stop_words_dropped() {
        let processor = TextProcessor::new();

        assert!(processor.tokenize("I a x").is_empty());
        assert!(processor.tokenize("the and of with").is_empty());
        assert!(processor.tokenize("").is_empty());
    }

    #[test]
    fn test_unicode_is_lowercased() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("ÜBER Größe");

        assert_eq!(tokens, vec!["über", "größe"]);
    }

    #[test]
    fn test_term_frequencies_keep_first_seen_order() {
        let processor = TextProcessor::new();
        let counts = processor.term_frequencies("SQL python sql Python sql");

        let terms: Vec<&String> = counts.keys().collect();
        assert_eq!(terms, vec!["sql", "python"]);
        assert_eq!(counts["sql"], 3);
        assert_eq!(counts["python"], 2);
    }
}
