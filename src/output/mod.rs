//! Report structures and their console/JSON renderings

pub mod report;
pub mod formatter;
