//! Input manager: reads documents from disk and routes them to extractors

use crate::error::{CareerMatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::extract_text;
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Extracted text is cached per path for the life of the manager
pub struct InputManager {
    cache: HashMap<String, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if let Some(cached_text) = self.cache.get(&path_str) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(CareerMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown {
            return Err(CareerMatcherError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        info!("Extracting {} text from: {}", file_type.name(), path.display());
        let bytes = fs::read(path).await?;
        let text = extract_text(file_type, &bytes)?;

        self.cache.insert(path_str, text.clone());

        Ok(text)
    }

    /// Like [`extract_text`](Self::extract_text), but an unsupported or corrupt
    /// document yields empty text instead of an error
    pub async fn extract_text_or_empty(&mut self, path: &Path) -> Result<String> {
        match self.extract_text(path).await {
            Err(err) if err.is_recoverable() => {
                warn!("No text available from {}: {}", path.display(), err);
                Ok(String::new())
            }
            other => other,
        }
    }

    /// Extract text from uploaded bytes with a declared MIME type
    pub fn extract_upload(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let file_type = FileType::from_mime(mime_type);
        extract_text(file_type, bytes).map_err(|err| match err {
            CareerMatcherError::UnsupportedFormat(_) if file_type == FileType::Unknown => {
                CareerMatcherError::UnsupportedFormat(format!("Unsupported MIME type: {}", mime_type))
            }
            other => other,
        })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
