//! The stream resolution pipeline.
//!
//! `StreamResolver` owns every collaborator as an injected trait object and
//! drives one request through cache lookup, id translation, title lookup,
//! query generation, indexer fan-out, ranking, content listing, file
//! matching and stream assembly. Nothing in here fails the request: every
//! collaborator error degrades to a smaller (possibly empty) result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::StreamCache;
use crate::config::{ResolverConfig, StreamsConfig};
use crate::content::{resolve_contents, ContentInspector};
use crate::matcher::FileMatcher;
use crate::meta::{IdMapper, MetadataProvider, TitleMeta};
use crate::metrics::{CACHE_LOOKUPS, RESOLVE_DURATION, STREAMS_RETURNED};
use crate::query::build_queries;
use crate::searcher::{rank_candidates, search_all, Searcher};
use crate::selector::{normalize_content_id, ContentSelector, MediaType};
use crate::streams::{assemble_streams, StreamDescriptor};

/// Resolves stream requests into playable torrent streams.
pub struct StreamResolver {
    searcher: Arc<dyn Searcher>,
    inspector: Arc<dyn ContentInspector>,
    metadata: Arc<dyn MetadataProvider>,
    id_mapper: Arc<dyn IdMapper>,
    cache: Arc<dyn StreamCache>,
    config: ResolverConfig,
    streams: StreamsConfig,
}

impl StreamResolver {
    pub fn new(
        searcher: Arc<dyn Searcher>,
        inspector: Arc<dyn ContentInspector>,
        metadata: Arc<dyn MetadataProvider>,
        id_mapper: Arc<dyn IdMapper>,
        cache: Arc<dyn StreamCache>,
        config: ResolverConfig,
        streams: StreamsConfig,
    ) -> Self {
        Self {
            searcher,
            inspector,
            metadata,
            id_mapper,
            cache,
            config,
            streams,
        }
    }

    /// Resolve `raw_id` (possibly percent-encoded) into stream descriptors.
    ///
    /// A non-empty cache entry returns the stored sequence as-is. An empty or
    /// missing entry resolves again, and the computed sequence, empty or not,
    /// is written back under the normalized id.
    pub async fn resolve(&self, media_type: MediaType, raw_id: &str) -> Vec<StreamDescriptor> {
        let start = Instant::now();
        let content_id = normalize_content_id(raw_id);

        if let Some(cached) = self.cached(&content_id) {
            info!(content_id = %content_id, streams = cached.len(), "Serving cached streams");
            self.observe("cached", media_type, cached.len(), start);
            return cached;
        }

        let selector = self.selector_for(media_type, &content_id).await;
        let meta = self.title_meta(&selector).await;

        let variants = build_queries(&selector, &meta);
        let found = search_all(self.searcher.as_ref(), &variants, self.search_timeout()).await;
        let ranked = rank_candidates(found, self.config.result_cap());
        debug!(
            content_id = %content_id,
            variants = variants.len(),
            candidates = ranked.len(),
            "Candidates ranked"
        );

        let resolved =
            resolve_contents(self.inspector.as_ref(), ranked, self.content_timeout()).await;

        let matcher = FileMatcher::new(&selector);
        let matches = resolved
            .into_iter()
            .filter_map(|candidate| {
                let file = matcher.select(&candidate.files)?;
                Some((candidate, file))
            })
            .collect();

        let streams = assemble_streams(&selector.base_id, matches, &self.streams);
        self.store(&content_id, &streams);

        info!(
            content_id = %content_id,
            media_type = %media_type,
            streams = streams.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolution complete"
        );
        let outcome = if streams.is_empty() { "empty" } else { "resolved" };
        self.observe(outcome, media_type, streams.len(), start);

        streams
    }

    /// Read-through. Empty entries and store errors count as a miss.
    fn cached(&self, content_id: &str) -> Option<Vec<StreamDescriptor>> {
        match self.cache.get(content_id) {
            Ok(Some(streams)) if streams.is_empty() => {
                CACHE_LOOKUPS.with_label_values(&["empty"]).inc();
                debug!(content_id = %content_id, "Cached entry is empty, resolving");
                None
            }
            Ok(Some(streams)) => {
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                Some(streams)
            }
            Ok(None) => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                None
            }
            Err(e) => {
                CACHE_LOOKUPS.with_label_values(&["error"]).inc();
                warn!(content_id = %content_id, error = %e, "Cache read failed, resolving");
                None
            }
        }
    }

    fn store(&self, content_id: &str, streams: &[StreamDescriptor]) {
        if let Err(e) = self.cache.put(content_id, streams) {
            warn!(content_id = %content_id, error = %e, "Cache write failed");
        }
    }

    /// Parse the id, translating alternate namespaces first.
    async fn selector_for(&self, media_type: MediaType, content_id: &str) -> ContentSelector {
        if !self.id_mapper.handles(content_id) {
            return ContentSelector::parse(media_type, content_id);
        }

        match tokio::time::timeout(self.metadata_timeout(), self.id_mapper.translate(content_id))
            .await
        {
            Ok(Ok(canonical)) => {
                debug!(content_id = %content_id, canonical = %canonical, "Translated id");
                ContentSelector::parse(media_type, &canonical)
            }
            Ok(Err(e)) => {
                warn!(content_id = %content_id, error = %e, "Id translation failed");
                ContentSelector::untranslated(media_type, content_id)
            }
            Err(_) => {
                warn!(content_id = %content_id, "Id translation timed out");
                ContentSelector::untranslated(media_type, content_id)
            }
        }
    }

    /// Title and year, or empty values when the lookup fails.
    async fn title_meta(&self, selector: &ContentSelector) -> TitleMeta {
        let lookup = self
            .metadata
            .lookup(&selector.base_id, selector.media_type);

        match tokio::time::timeout(self.metadata_timeout(), lookup).await {
            Ok(Ok(meta)) => meta,
            Ok(Err(e)) => {
                warn!(
                    provider = self.metadata.name(),
                    base_id = %selector.base_id,
                    error = %e,
                    "Title lookup failed, searching degraded"
                );
                TitleMeta::default()
            }
            Err(_) => {
                warn!(
                    provider = self.metadata.name(),
                    base_id = %selector.base_id,
                    "Title lookup timed out, searching degraded"
                );
                TitleMeta::default()
            }
        }
    }

    fn observe(&self, outcome: &str, media_type: MediaType, streams: usize, start: Instant) {
        RESOLVE_DURATION
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());
        STREAMS_RETURNED
            .with_label_values(&[media_type.as_str()])
            .observe(streams as f64);
    }

    fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.config.search_timeout_secs)
    }

    fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.config.content_timeout_secs)
    }

    fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.config.metadata_timeout_secs)
    }
}
