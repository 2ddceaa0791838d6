//! Matching engine: corpus indexing, query projection, ranking and skill gaps

pub mod document;
pub mod text_processor;
pub mod vector;
pub mod index;
pub mod vectorizer;
pub mod ranker;
pub mod store;
pub mod skills;
pub mod catalog;
pub mod ats_matcher;
pub mod analyzer;
