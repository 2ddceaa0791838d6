//! Error handling for the career matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus is empty: {0}")]
    EmptyCorpus(String),

    #[error("Unknown job title: {0}")]
    UnknownJobTitle(String),

    #[error("Keyword checklist is empty")]
    EmptyChecklist,

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Index storage error: {0}")]
    IndexStorage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, CareerMatcherError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for CareerMatcherError {
    fn from(err: anyhow::Error) -> Self {
        CareerMatcherError::Processing(err.to_string())
    }
}

/// Convert bincode errors raised while reading or writing a persisted index
impl From<bincode::Error> for CareerMatcherError {
    fn from(err: bincode::Error) -> Self {
        CareerMatcherError::IndexStorage(err.to_string())
    }
}

impl CareerMatcherError {
    /// Whether the caller is expected to recover with a documented fallback
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CareerMatcherError::EmptyCorpus(_)
                | CareerMatcherError::UnknownJobTitle(_)
                | CareerMatcherError::UnsupportedFormat(_)
                | CareerMatcherError::CorruptDocument(_)
                | CareerMatcherError::DegenerateVector(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(CareerMatcherError::UnknownJobTitle("x".into()).is_recoverable());
        assert!(CareerMatcherError::EmptyCorpus("x".into()).is_recoverable());
        assert!(!CareerMatcherError::EmptyChecklist.is_recoverable());
        assert!(!CareerMatcherError::Configuration("x".into()).is_recoverable());
    }
}
