//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without Jackett,
//! Cinemeta or a torrent swarm.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use godon_core::{
    testing::{MockIdMapper, MockInspector, MockMetadataProvider, MockSearcher},
    MemoryStreamCache, ResolverConfig, StreamResolver, StreamsConfig,
};

/// Re-export fixtures for test convenience
pub use godon_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_movie_streams() {
///     let fixture = TestFixture::new();
///     fixture.metadata.set_meta("tt1", TitleMeta::new("Film", "2001")).await;
///
///     let response = fixture.get("/stream/movie/tt1.json").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock searcher - configure search results
    pub searcher: Arc<MockSearcher>,
    /// Mock inspector - configure torrent file listings
    pub inspector: Arc<MockInspector>,
    /// Mock metadata provider - configure titles and years
    pub metadata: Arc<MockMetadataProvider>,
    /// Mock id mapper - configure Kitsu translations
    pub id_mapper: Arc<MockIdMapper>,
    /// In-memory stream cache
    pub cache: Arc<MemoryStreamCache>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub access_control: Option<String>,
    pub text: String,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        let searcher = Arc::new(MockSearcher::new());
        let inspector = Arc::new(MockInspector::new());
        let metadata = Arc::new(MockMetadataProvider::new());
        let id_mapper = Arc::new(MockIdMapper::new());
        let cache = Arc::new(MemoryStreamCache::new());

        let resolver = Arc::new(StreamResolver::new(
            searcher.clone(),
            inspector.clone(),
            metadata.clone(),
            id_mapper.clone(),
            cache.clone(),
            ResolverConfig::default(),
            StreamsConfig::default(),
        ));

        let state = Arc::new(godon_server::state::AppState::new(resolver));
        let router = godon_server::api::create_router(state);

        Self {
            router,
            searcher,
            inspector,
            metadata,
            id_mapper,
            cache,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Origin", "https://web.stremio.com")
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let content_type = header("content-type");
        let access_control = header("access-control-allow-origin");

        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            access_control,
            text,
            body,
        }
    }
}
