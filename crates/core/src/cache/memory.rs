//! In-process stream cache, used by tests and cache-less deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CacheError, StreamCache};
use crate::streams::StreamDescriptor;

/// HashMap-backed cache. Entries are stored serialized, like the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStreamCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStreamCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StreamCache for MemoryStreamCache {
    fn get(&self, content_id: &str) -> Result<Option<Vec<StreamDescriptor>>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Database(e.to_string()))?;
        entries
            .get(content_id)
            .map(|doc| serde_json::from_str(doc))
            .transpose()
            .map_err(CacheError::from)
    }

    fn put(&self, content_id: &str, streams: &[StreamDescriptor]) -> Result<(), CacheError> {
        let doc = serde_json::to_string(streams)?;
        self.entries
            .write()
            .map_err(|e| CacheError::Database(e.to_string()))?
            .insert(content_id.to_string(), doc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_miss_then_hit() {
        let cache = MemoryStreamCache::new();
        assert!(cache.get("tt1").unwrap().is_none());

        let streams = vec![fixtures::stream("A", "aaa", 1)];
        cache.put("tt1", &streams).unwrap();
        assert_eq!(cache.get("tt1").unwrap(), Some(streams));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_entry_round_trips() {
        let cache = MemoryStreamCache::new();
        cache.put("tt1:1:1", &[]).unwrap();
        assert_eq!(cache.get("tt1:1:1").unwrap(), Some(vec![]));
    }
}
