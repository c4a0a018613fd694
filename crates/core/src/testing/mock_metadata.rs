//! Mock metadata provider and id mapper for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::meta::{IdMapper, MetaError, MetadataProvider, TitleMeta};
use crate::selector::MediaType;

/// A recorded metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLookup {
    pub base_id: String,
    pub media_type: MediaType,
}

/// Mock implementation of the MetadataProvider trait.
///
/// Unknown ids return `MetaError::NotFound`.
#[derive(Debug, Default)]
pub struct MockMetadataProvider {
    titles: Arc<RwLock<HashMap<String, TitleMeta>>>,
    failing: Arc<RwLock<bool>>,
    lookups: Arc<RwLock<Vec<RecordedLookup>>>,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_meta(&self, base_id: &str, meta: TitleMeta) {
        self.titles.write().await.insert(base_id.to_string(), meta);
    }

    /// Make every lookup fail with an API error.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn recorded_lookups(&self) -> Vec<RecordedLookup> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, base_id: &str, media_type: MediaType) -> Result<TitleMeta, MetaError> {
        self.lookups.write().await.push(RecordedLookup {
            base_id: base_id.to_string(),
            media_type,
        });

        if *self.failing.read().await {
            return Err(MetaError::ApiError {
                status: 503,
                message: "mock failure".to_string(),
            });
        }

        self.titles
            .read()
            .await
            .get(base_id)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(base_id.to_string()))
    }
}

/// Mock implementation of the IdMapper trait for `kitsu:` ids.
#[derive(Debug, Default)]
pub struct MockIdMapper {
    translations: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockIdMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `alternate_id` into `canonical`.
    pub async fn set_translation(&self, alternate_id: &str, canonical: &str) {
        self.translations
            .write()
            .await
            .insert(alternate_id.to_string(), canonical.to_string());
    }

    pub async fn translate_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl IdMapper for MockIdMapper {
    fn handles(&self, id: &str) -> bool {
        id.starts_with("kitsu:")
    }

    async fn translate(&self, alternate_id: &str) -> Result<String, MetaError> {
        self.calls.write().await.push(alternate_id.to_string());
        self.translations
            .read()
            .await
            .get(alternate_id)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(alternate_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metadata_lookup_and_failure() {
        let provider = MockMetadataProvider::new();
        provider.set_meta("tt1", TitleMeta::new("Show", "2011")).await;

        let meta = provider.lookup("tt1", MediaType::Series).await.unwrap();
        assert_eq!(meta.title, "Show");
        assert!(provider.lookup("tt2", MediaType::Series).await.is_err());

        provider.set_failing(true).await;
        assert!(provider.lookup("tt1", MediaType::Series).await.is_err());
        assert_eq!(provider.recorded_lookups().await.len(), 3);
    }

    #[tokio::test]
    async fn test_id_mapper() {
        let mapper = MockIdMapper::new();
        mapper
            .set_translation("kitsu:1:2", "tt9:1:2:1:2:true")
            .await;

        assert!(mapper.handles("kitsu:1:2"));
        assert!(!mapper.handles("tt9"));
        assert_eq!(mapper.translate("kitsu:1:2").await.unwrap(), "tt9:1:2:1:2:true");
        assert!(mapper.translate("kitsu:3").await.is_err());
        assert_eq!(mapper.translate_count().await, 2);
    }
}
