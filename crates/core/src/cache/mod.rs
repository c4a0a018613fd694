//! Stream cache - the last resolution result per content id.
//!
//! Entries are whole JSON documents: a write replaces the previous entry,
//! an empty sequence is a valid "nothing found" entry.

mod memory;
mod sqlite;

pub use memory::MemoryStreamCache;
pub use sqlite::SqliteStreamCache;

use thiserror::Error;

use crate::streams::StreamDescriptor;

/// Errors from the cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for stream cache storage.
pub trait StreamCache: Send + Sync {
    /// Cached streams for `content_id`, or `None` on a miss.
    fn get(&self, content_id: &str) -> Result<Option<Vec<StreamDescriptor>>, CacheError>;

    /// Replace the entry for `content_id`.
    fn put(&self, content_id: &str, streams: &[StreamDescriptor]) -> Result<(), CacheError>;
}
