//! Persistence of corpus indexes as opaque bincode blobs keyed by corpus hash

use crate::error::{CareerMatcherError, Result};
use crate::processing::document::JobRecord;
use crate::processing::index::{corpus_fingerprint, CorpusIndex};
use crate::processing::text_processor::TOKENIZER_VERSION;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tokio::fs;

const INDEX_EXTENSION: &str = "idx";

/// Whether an index came from disk or was built fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Cached,
    Built,
}

pub struct LoadedIndex {
    pub index: CorpusIndex,
    pub origin: IndexOrigin,
    pub path: PathBuf,
}

/// Serialize an index to an opaque blob
pub fn encode_index(index: &CorpusIndex) -> Result<Vec<u8>> {
    Ok(bincode::serialize(index)?)
}

/// Decode a blob, rejecting indexes built with a different tokenizer
pub fn decode_index(bytes: &[u8]) -> Result<CorpusIndex> {
    let index: CorpusIndex = bincode::deserialize(bytes)?;
    if index.tokenizer_version() != TOKENIZER_VERSION {
        return Err(CareerMatcherError::IndexStorage(format!(
            "index uses tokenizer v{}, expected v{}",
            index.tokenizer_version(),
            TOKENIZER_VERSION
        )));
    }
    Ok(index)
}

/// Directory of persisted indexes, one file per corpus hash
pub struct IndexStore {
    index_dir: PathBuf,
}

impl IndexStore {
    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
        }
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn path_for(&self, corpus_hash: &str) -> PathBuf {
        self.index_dir.join(format!("{}.{}", corpus_hash, INDEX_EXTENSION))
    }

    /// Write through a temp file in the same directory, then rename over the
    /// target so readers never see a partial blob
    pub async fn save(&self, index: &CorpusIndex) -> Result<PathBuf> {
        fs::create_dir_all(&self.index_dir).await?;
        let path = self.path_for(index.corpus_hash());
        let bytes = encode_index(index)?;

        let temp_path = Builder::new()
            .prefix(".index-")
            .tempfile_in(&self.index_dir)?
            .into_temp_path();
        fs::write(&temp_path, &bytes).await?;
        temp_path.persist(&path).map_err(|e| CareerMatcherError::Io(e.error))?;

        info!("Saved index {} ({} bytes) to {}", index.short_hash(), bytes.len(), path.display());
        Ok(path)
    }

    /// `Ok(None)` when no index exists for the hash
    pub async fn load(&self, corpus_hash: &str) -> Result<Option<CorpusIndex>> {
        let path = self.path_for(corpus_hash);
        if !path.exists() {
            debug!("No persisted index at {}", path.display());
            return Ok(None);
        }

        let bytes = fs::read(&path).await?;
        let index = decode_index(&bytes)?;
        if index.corpus_hash() != corpus_hash {
            return Err(CareerMatcherError::IndexStorage(format!(
                "{} holds index {} instead of {}",
                path.display(),
                index.short_hash(),
                corpus_hash
            )));
        }

        Ok(Some(index))
    }

    /// Reuse the persisted index for `records` when present and valid,
    /// otherwise build and persist a fresh one
    pub async fn load_or_build(&self, records: &[JobRecord], force: bool) -> Result<LoadedIndex> {
        let corpus_hash = corpus_fingerprint(records);
        let path = self.path_for(&corpus_hash);

        if !force {
            match self.load(&corpus_hash).await {
                Ok(Some(index)) => {
                    info!("Using cached index {} from {}", index.short_hash(), path.display());
                    return Ok(LoadedIndex {
                        index,
                        origin: IndexOrigin::Cached,
                        path,
                    });
                }
                Ok(None) => {}
                Err(err) => warn!("Discarding unreadable index {}: {}", path.display(), err),
            }
        }

        let index = CorpusIndex::build(records);
        let path = self.save(&index).await?;
        Ok(LoadedIndex {
            index,
            origin: IndexOrigin::Built,
            path,
        })
    }

    /// Remove every persisted index, returning how many were deleted
    pub async fn clear(&self) -> Result<usize> {
        if !self.index_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.index_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(INDEX_EXTENSION) {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<JobRecord> {
        vec![
            JobRecord::new("1", "Data Scientist", "Python SQL machine learning", ""),
            JobRecord::new("2", "Web Developer", "JavaScript React", "CSS"),
        ]
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path());
        let index = CorpusIndex::build(&records());

        let path = store.save(&index).await.unwrap();
        assert!(path.exists());

        let loaded = store.load(index.corpus_hash()).await.unwrap().unwrap();
        assert_eq!(loaded.documents(), index.documents());
        assert!(loaded.terms().eq(index.terms()));
        assert_eq!(loaded.built_at(), index.built_at());
    }

    #[tokio::test]
    async fn test_load_or_build_reuses_cache() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path());

        let first = store.load_or_build(&records(), false).await.unwrap();
        assert_eq!(first.origin, IndexOrigin::Built);

        let second = store.load_or_build(&records(), false).await.unwrap();
        assert_eq!(second.origin, IndexOrigin::Cached);
        assert_eq!(second.index.corpus_hash(), first.index.corpus_hash());

        let forced = store.load_or_build(&records(), true).await.unwrap();
        assert_eq!(forced.origin, IndexOrigin::Built);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path());
        let hash = corpus_fingerprint(&records());
        std::fs::write(store.path_for(&hash), b"not an index").unwrap();

        assert!(store.load(&hash).await.is_err());

        let loaded = store.load_or_build(&records(), false).await.unwrap();
        assert_eq!(loaded.origin, IndexOrigin::Built);
        assert!(store.load(&hash).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_index_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("nested"));

        assert!(store.load("deadbeef").await.unwrap().is_none());
        assert_eq!(store.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_removes_indexes() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path());
        store.save(&CorpusIndex::build(&records())).await.unwrap();

        // The temp file is renamed into place, so only the blob remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(store.clear().await.unwrap(), 1);
    }
}
