//! Title metadata and id-namespace translation.
//!
//! `MetadataProvider` turns a base id into the title/year pair used to build
//! search queries. `IdMapper` translates ids from other catalogs (Kitsu) into
//! the canonical IMDb form understood by the rest of the pipeline.

mod cinemeta;
mod kitsu;

pub use cinemeta::CinemetaClient;
pub use kitsu::KitsuMapper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selector::MediaType;

/// Title and release year for a base id.
///
/// An empty value means the lookup failed and queries run degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMeta {
    pub title: String,
    pub year: String,
}

impl TitleMeta {
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
        }
    }
}

/// Errors from metadata and mapping services.
#[derive(Debug, Error)]
pub enum MetaError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404 or missing fields).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response or id.
    #[error("Failed to parse: {0}")]
    ParseError(String),
}

/// Looks up the display title and year of a base id.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, base_id: &str, media_type: MediaType) -> Result<TitleMeta, MetaError>;
}

/// Translates ids from a non-native namespace.
#[async_trait]
pub trait IdMapper: Send + Sync {
    /// Whether the id belongs to a namespace this mapper translates.
    fn handles(&self, id: &str) -> bool;

    /// Return the canonical `tt…[:s:e:absS:absE:true]` form of `alternate_id`.
    async fn translate(&self, alternate_id: &str) -> Result<String, MetaError>;
}

/// First run of four ASCII digits, e.g. "2011" out of "2011–2019".
pub(crate) fn extract_year(text: &str) -> Option<String> {
    text.as_bytes()
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|i| text[i..i + 4].to_string())
}
