//! Content-addressed batch cache
//!
//! Batches are keyed by the SHA-256 of the raw input bytes, so re-ingesting
//! an identical upload returns the shared batch without decoding again.
//! The cache is an ordinary value owned by the caller; nothing is global.

use crate::error::IngestResult;
use crate::workflow::{IngestedBatch, Pipeline};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Lower-case hex SHA-256 of a byte buffer
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Cache of ingested batches
#[derive(Debug, Default)]
pub struct IngestCache {
    entries: HashMap<String, Arc<IngestedBatch>>,
}

impl IngestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached batch for a content hash
    pub fn get(&self, hash: &str) -> Option<Arc<IngestedBatch>> {
        self.entries.get(hash).cloned()
    }

    /// Return the cached batch for these bytes, ingesting on a miss
    ///
    /// Failed ingestions are not cached.
    pub fn get_or_ingest(&mut self, bytes: &[u8], pipeline: &Pipeline) -> IngestResult<Arc<IngestedBatch>> {
        let hash = content_hash(bytes);

        if let Some(batch) = self.entries.get(&hash) {
            debug!(hash = %hash, "Ingest cache hit");
            return Ok(Arc::clone(batch));
        }

        debug!(hash = %hash, "Ingest cache miss");
        let batch = Arc::new(pipeline.ingest(bytes)?);
        self.entries.insert(hash, Arc::clone(&batch));
        Ok(batch)
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, hash: &str) -> bool {
        self.entries.remove(hash).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"Case Id,Case Start Date,Last Note\nC1,01/02/2024,SR 14321\n";

    #[test]
    fn test_content_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash(CSV).len(), 64);
    }

    #[test]
    fn test_hit_returns_same_batch() {
        let pipeline = Pipeline::default();
        let mut cache = IngestCache::new();

        let first = cache.get_or_ingest(CSV, &pipeline).unwrap();
        let second = cache.get_or_ingest(CSV, &pipeline).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.content_hash, content_hash(CSV));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let pipeline = Pipeline::default();
        let mut cache = IngestCache::new();

        let first = cache.get_or_ingest(CSV, &pipeline).unwrap();
        assert!(cache.invalidate(&first.content_hash));
        assert!(!cache.invalidate(&first.content_hash));
        assert!(cache.is_empty());

        let again = cache.get_or_ingest(CSV, &pipeline).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));

        cache.get_or_ingest(b"Case Id\n", &pipeline).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.get(&again.content_hash).is_none());
    }
}
