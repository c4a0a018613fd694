//! Mock content inspector for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::content::{ContentError, ContentInspector, TorrentFileList};

/// Mock implementation of the ContentInspector trait.
///
/// Listings, errors and delays are keyed by source URI. A URI with nothing
/// configured fails, like an unreachable swarm.
#[derive(Debug, Default)]
pub struct MockInspector {
    listings: Arc<RwLock<HashMap<String, TorrentFileList>>>,
    errors: Arc<RwLock<HashMap<String, ContentError>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `source_uri` with `files`.
    pub async fn set_files(&self, source_uri: &str, files: TorrentFileList) {
        self.listings
            .write()
            .await
            .insert(source_uri.to_string(), files);
    }

    /// Fail every listing of `source_uri`.
    pub async fn set_error(&self, source_uri: &str, error: ContentError) {
        self.errors
            .write()
            .await
            .insert(source_uri.to_string(), error);
    }

    /// Answer `source_uri` only after `delay`.
    pub async fn set_delay(&self, source_uri: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(source_uri.to_string(), delay);
    }

    /// Source URIs requested so far, in call order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl ContentInspector for MockInspector {
    async fn list_files(&self, source_uri: &str) -> Result<TorrentFileList, ContentError> {
        self.calls.write().await.push(source_uri.to_string());

        let delay = self.delays.read().await.get(source_uri).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.errors.read().await.get(source_uri).cloned() {
            return Err(err);
        }

        self.listings
            .read()
            .await
            .get(source_uri)
            .cloned()
            .ok_or_else(|| ContentError::Session(format!("no peers for {}", source_uri)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_configured_and_unknown_uris() {
        let inspector = MockInspector::new();
        inspector
            .set_files("magnet:?xt=urn:btih:aaa", fixtures::file_list(&["a.mkv"]))
            .await;

        let listed = inspector.list_files("magnet:?xt=urn:btih:aaa").await.unwrap();
        assert_eq!(listed.files.len(), 1);
        assert!(inspector.list_files("magnet:?xt=urn:btih:zzz").await.is_err());
        assert_eq!(inspector.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_error_wins_over_listing() {
        let inspector = MockInspector::new();
        inspector
            .set_files("http://t/1.torrent", fixtures::file_list(&["a.mkv"]))
            .await;
        inspector
            .set_error("http://t/1.torrent", ContentError::Http("404".into()))
            .await;

        let err = inspector.list_files("http://t/1.torrent").await.unwrap_err();
        assert!(matches!(err, ContentError::Http(_)));
    }
}
