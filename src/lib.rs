//! Career matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{CareerMatcherError, Result};
pub use config::Config;
pub use processing::analyzer::{CandidateProfile, GapAnalyzer, GapReport};
pub use processing::index::CorpusIndex;
pub use processing::ranker::{RankingResult, SimilarityRanker};
pub use processing::vectorizer::QueryVectorizer;
