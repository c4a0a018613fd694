//! Types for the torrent search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::QueryVariant;
use crate::selector::MediaType;

/// Query parameters for a torrent search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text search query.
    pub query: String,
    /// Restrict results to these categories (empty means no restriction).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<SearchCategory>,
}

impl SearchQuery {
    /// A query restricted to the categories of `media_type`.
    pub fn for_media(query: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: query.into(),
            categories: SearchCategory::for_media_type(media_type),
        }
    }
}

impl From<&QueryVariant> for SearchQuery {
    fn from(variant: &QueryVariant) -> Self {
        Self::for_media(variant.query.clone(), variant.media_type)
    }
}

/// Content category for filtering search results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    Movies,
    Tv,
    Anime,
}

impl SearchCategory {
    pub fn for_media_type(media_type: MediaType) -> Vec<SearchCategory> {
        match media_type {
            MediaType::Movie => vec![SearchCategory::Movies],
            MediaType::Series => vec![SearchCategory::Tv],
            MediaType::Anime => vec![SearchCategory::Tv, SearchCategory::Anime],
        }
    }
}

/// One indexer search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Release title as reported by the indexer.
    pub title: String,
    /// Info hash (lowercase hex), when the indexer reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    /// Magnet link or .torrent download URL.
    pub source_uri: String,
    /// Peers reported by the indexer; 0 when missing or unparseable.
    pub peer_count: u64,
}

impl Candidate {
    /// Identity used for deduplication: the info hash, else the title.
    pub fn identity_key(&self) -> &str {
        match self.info_hash.as_deref() {
            Some(hash) if !hash.is_empty() => hash,
            _ => &self.title,
        }
    }

    pub fn is_magnet(&self) -> bool {
        is_magnet_uri(&self.source_uri)
    }
}

/// Whether `uri` is a `magnet:` link rather than a downloadable .torrent.
pub fn is_magnet_uri(uri: &str) -> bool {
    uri.starts_with("magnet:")
}

/// Parse a textual peer count. Anything that is not a non-negative integer is 0.
pub fn parse_peer_count(text: &str) -> u64 {
    text.trim().parse::<u64>().unwrap_or(0)
}

/// Errors that can occur during search operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for torrent search backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Execute a single search.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError>;
}
