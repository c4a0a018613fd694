//! SQLite-backed stream cache implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{CacheError, StreamCache};
use crate::streams::StreamDescriptor;

/// SQLite-backed stream cache.
pub struct SqliteStreamCache {
    conn: Mutex<Connection>,
}

impl SqliteStreamCache {
    /// Open the cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            -- One JSON document per content id
            CREATE TABLE IF NOT EXISTS stream_cache (
                content_id TEXT PRIMARY KEY,
                streams TEXT NOT NULL,
                stream_count INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|e| CacheError::Database(format!("connection lock poisoned: {}", e)))
    }
}

impl StreamCache for SqliteStreamCache {
    fn get(&self, content_id: &str) -> Result<Option<Vec<StreamDescriptor>>, CacheError> {
        let conn = self.lock()?;
        let doc: Option<String> = conn
            .query_row(
                "SELECT streams FROM stream_cache WHERE content_id = ?",
                params![content_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    fn put(&self, content_id: &str, streams: &[StreamDescriptor]) -> Result<(), CacheError> {
        let doc = serde_json::to_string(streams)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO stream_cache (content_id, streams, stream_count, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(content_id) DO UPDATE SET
                streams = excluded.streams,
                stream_count = excluded.stream_count,
                updated_at = excluded.updated_at",
            params![
                content_id,
                doc,
                streams.len() as i64,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing() {
        let cache = SqliteStreamCache::in_memory().unwrap();
        assert!(cache.get("tt0944947:1:1").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get_preserves_order() {
        let cache = SqliteStreamCache::in_memory().unwrap();
        let streams = vec![
            fixtures::stream("First", "aaa", 3),
            fixtures::stream("Second", "bbb", 1),
        ];

        cache.put("tt0944947:1:1", &streams).unwrap();
        let cached = cache.get("tt0944947:1:1").unwrap().unwrap();
        assert_eq!(cached, streams);
    }

    #[test]
    fn test_put_overwrites_whole_entry() {
        let cache = SqliteStreamCache::in_memory().unwrap();
        cache
            .put(
                "tt1",
                &[fixtures::stream("Old", "aaa", 1), fixtures::stream("Old2", "bbb", 1)],
            )
            .unwrap();
        cache.put("tt1", &[fixtures::stream("New", "ccc", 2)]).unwrap();

        let cached = cache.get("tt1").unwrap().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].title, "New");
    }

    #[test]
    fn test_empty_entry_is_a_hit() {
        let cache = SqliteStreamCache::in_memory().unwrap();
        cache.put("tt1", &[]).unwrap();
        assert_eq!(cache.get("tt1").unwrap(), Some(vec![]));
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.db");

        {
            let cache = SqliteStreamCache::new(&path).unwrap();
            cache.put("tt1", &[fixtures::stream("Kept", "aaa", 1)]).unwrap();
        }

        let cache = SqliteStreamCache::new(&path).unwrap();
        let cached = cache.get("tt1").unwrap().unwrap();
        assert_eq!(cached[0].title, "Kept");
    }
}
