use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use godon_core::{MediaType, StreamDescriptor};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /stream/{media_type}/{id}
///
/// Resolve streams for a movie, series episode or anime episode. The id may
/// carry the `.json` suffix Stremio appends.
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((media_type, id)): Path<(String, String)>,
) -> Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let media_type: MediaType = media_type.parse().map_err(|e| {
        warn!(media_type = %media_type, "Rejected stream request");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("{}", e),
            }),
        )
    })?;

    let id = id.strip_suffix(".json").unwrap_or(&id);
    if id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing content id".to_string(),
            }),
        ));
    }

    debug!(media_type = %media_type, id = %id, "Stream request");
    let streams = state.resolver().resolve(media_type, id).await;

    Ok(Json(StreamsResponse { streams }))
}
