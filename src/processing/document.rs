//! Job posting records as supplied by the corpus loader

use crate::error::{CareerMatcherError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tokio::fs;

/// One job posting. Missing or `null` text fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills_text: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_posting_url: Option<String>,
}

impl JobRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        skills_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            skills_text: skills_text.into(),
            company_name: None,
            location: None,
            job_posting_url: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_posting_url(mut self, url: impl Into<String>) -> Self {
        self.job_posting_url = Some(url.into());
        self
    }

    /// Title, description and skills text joined with single spaces
    pub fn combined_text(&self) -> String {
        [&self.title, &self.description, &self.skills_text]
            .iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawIdentifier::deserialize(deserializer)? {
        RawIdentifier::Text(text) => text,
        RawIdentifier::Number(number) => number.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a JSON array of job records
pub fn parse_job_records(json: &str) -> Result<Vec<JobRecord>> {
    let records: Vec<JobRecord> = serde_json::from_str(json)?;
    Ok(records)
}

/// Read job records from a JSON file
pub async fn load_job_records(path: &Path) -> Result<Vec<JobRecord>> {
    if !path.exists() {
        return Err(CareerMatcherError::InvalidInput(format!(
            "Corpus file does not exist: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).await?;
    let records = parse_job_records(&content)?;
    log::info!("Loaded {} job records from {}", records.len(), path.display());
    Ok(records)
}
