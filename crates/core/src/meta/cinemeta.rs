//! Cinemeta addon client (`/meta/{type}/{id}.json`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{extract_year, MetaError, MetadataProvider, TitleMeta};
use crate::config::MetadataConfig;
use crate::selector::MediaType;

/// Cinemeta metadata client.
pub struct CinemetaClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CinemetaResponse {
    meta: Option<CinemetaMeta>,
}

#[derive(Debug, Deserialize)]
struct CinemetaMeta {
    name: Option<String>,
    #[serde(default)]
    year: Option<serde_json::Value>,
    #[serde(rename = "releaseInfo", default)]
    release_info: Option<String>,
}

impl CinemetaClient {
    pub fn new(config: &MetadataConfig) -> Result<Self, MetaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.cinemeta_url.trim_end_matches('/').to_string(),
        })
    }

    fn meta_url(&self, base_id: &str, media_type: MediaType) -> String {
        // Cinemeta only knows movies and series
        let kind = match media_type {
            MediaType::Movie => "movie",
            MediaType::Series | MediaType::Anime => "series",
        };
        format!(
            "{}/meta/{}/{}.json",
            self.base_url,
            kind,
            urlencoding::encode(base_id)
        )
    }
}

#[async_trait]
impl MetadataProvider for CinemetaClient {
    fn name(&self) -> &str {
        "cinemeta"
    }

    async fn lookup(&self, base_id: &str, media_type: MediaType) -> Result<TitleMeta, MetaError> {
        let url = self.meta_url(base_id, media_type);
        debug!(base_id, %media_type, "Cinemeta lookup");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MetaError::NotFound(base_id.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MetaError::ApiError {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: CinemetaResponse = response
            .json()
            .await
            .map_err(|e| MetaError::ParseError(e.to_string()))?;

        parse_meta(base_id, body)
    }
}

fn parse_meta(base_id: &str, body: CinemetaResponse) -> Result<TitleMeta, MetaError> {
    let meta = body
        .meta
        .ok_or_else(|| MetaError::NotFound(base_id.to_string()))?;
    let title = meta
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| MetaError::NotFound(format!("{} has no name", base_id)))?;

    let year_text = match meta.year {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let year = year_text
        .as_deref()
        .and_then(extract_year)
        .or_else(|| meta.release_info.as_deref().and_then(extract_year))
        .unwrap_or_default();

    Ok(TitleMeta {
        title: title.trim().to_string(),
        year,
    })
}
