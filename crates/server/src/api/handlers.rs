use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::metrics::encode_metrics;

/// Addon identity announced to Stremio.
const ADDON_ID: &str = "strem.go.beta";
const ADDON_NAME: &str = "GoDon";
const ADDON_DESCRIPTION: &str = "Torrent streams for movies, series and anime";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestResponse {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
    pub resources: Vec<String>,
    pub id_prefixes: Vec<String>,
}

pub async fn root() -> &'static str {
    "Working"
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /manifest.json
pub async fn manifest() -> Json<ManifestResponse> {
    Json(ManifestResponse {
        id: ADDON_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: ADDON_NAME.to_string(),
        description: ADDON_DESCRIPTION.to_string(),
        types: vec!["movie".into(), "series".into(), "anime".into()],
        catalogs: Vec::new(),
        resources: vec!["stream".into()],
        id_prefixes: vec!["tt".into(), "kitsu".into()],
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    match encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}
