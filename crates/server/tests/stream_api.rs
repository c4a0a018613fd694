//! End-to-end tests of the addon HTTP surface with mocked collaborators.

mod common;

use axum::http::StatusCode;
use godon_core::{StreamCache, TitleMeta};

use common::{fixtures, TestFixture};

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "Working");
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_manifest() {
    let fixture = TestFixture::new();
    let response = fixture.get("/manifest.json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], "strem.go.beta");
    assert_eq!(response.body["name"], "GoDon");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(response.body["resources"][0], "stream");
    assert_eq!(response.body["types"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["idPrefixes"][1], "kitsu");
    assert!(response.body["catalogs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let fixture = TestFixture::new();
    let response = fixture.get("/manifest.json").await;
    assert_eq!(response.access_control.as_deref(), Some("*"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/health").await;

    let response = fixture.get("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("text/plain"));
    assert!(response.text.contains("godon_http_requests_total"));
}

// =============================================================================
// Stream Resolution Tests
// =============================================================================

#[tokio::test]
async fn test_movie_streams() {
    let fixture = TestFixture::new();
    fixture
        .metadata
        .set_meta("tt0133093", TitleMeta::new("The Matrix", "1999"))
        .await;
    fixture
        .searcher
        .set_results(vec![fixtures::candidate("The Matrix 1999 2160p", "abc", 77)])
        .await;
    fixture
        .inspector
        .set_files(
            &fixtures::magnet("abc"),
            fixtures::file_list(&["poster.jpg", "The.Matrix.1999.2160p.mkv"]),
        )
        .await;

    let response = fixture.get("/stream/movie/tt0133093.json").await;

    assert_eq!(response.status, StatusCode::OK);
    let streams = response.body["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0]["title"], "The Matrix 1999 2160p");
    assert_eq!(streams[0]["infoHash"], "abc");
    assert_eq!(streams[0]["fileIdx"], 2);
    assert_eq!(streams[0]["behaviorHints"]["bingeGroup"], "group-tt0133093");
    assert_eq!(streams[0]["behaviorHints"]["countryWhitelist"][0], "en");
}

#[tokio::test]
async fn test_series_streams_with_encoded_id() {
    let fixture = TestFixture::new();
    fixture
        .metadata
        .set_meta("tt0944947", TitleMeta::new("Game of Thrones", "2011"))
        .await;
    fixture
        .searcher
        .set_results(vec![fixtures::candidate("Game of Thrones S01E05 720p", "ep5", 12)])
        .await;
    fixture
        .inspector
        .set_files(
            &fixtures::magnet("ep5"),
            fixtures::file_list(&["Game.of.Thrones.S01E05.720p.mkv"]),
        )
        .await;

    let response = fixture.get("/stream/series/tt0944947%3A1%3A5.json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["streams"].as_array().unwrap().len(), 1);
    assert!(fixture.cache.get("tt0944947:1:5").unwrap().is_some());
}

#[tokio::test]
async fn test_nothing_found_returns_empty_list() {
    let fixture = TestFixture::new();
    let response = fixture.get("/stream/movie/tt0000000.json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["streams"], serde_json::json!([]));
}

#[tokio::test]
async fn test_cached_streams_are_served() {
    let fixture = TestFixture::new();
    fixture
        .cache
        .put("tt1", &[fixtures::stream("Cached", "cafe", 3)])
        .unwrap();

    let response = fixture.get("/stream/movie/tt1.json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["streams"][0]["infoHash"], "cafe");
    assert_eq!(fixture.searcher.search_count().await, 0);
}

#[tokio::test]
async fn test_anime_kitsu_id() {
    let fixture = TestFixture::new();
    fixture
        .id_mapper
        .set_translation("kitsu:7442:3", "tt2560140:1:3:1:3:true")
        .await;
    fixture
        .metadata
        .set_meta("tt2560140", TitleMeta::new("Attack on Titan", "2013"))
        .await;

    let response = fixture.get("/stream/anime/kitsu:7442:3.json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(fixture.id_mapper.translate_count().await, 1);
    assert_eq!(fixture.searcher.search_count().await, 9);
}

#[tokio::test]
async fn test_unknown_media_type_is_rejected() {
    let fixture = TestFixture::new();
    let response = fixture.get("/stream/channel/tt1.json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("channel"));
    assert_eq!(fixture.searcher.search_count().await, 0);
}
