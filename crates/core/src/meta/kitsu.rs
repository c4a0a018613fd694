//! Kitsu id translation through the anime-kitsu addon.
//!
//! `kitsu:{id}:{episode}` becomes `{imdb}:{season}:{episode}:{absSeason}:{absEpisode}:true`
//! using the IMDb mapping published in the addon's `videos` list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{IdMapper, MetaError};
use crate::config::MetadataConfig;

const KITSU_PREFIX: &str = "kitsu:";

/// Kitsu to IMDb id mapper.
pub struct KitsuMapper {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct KitsuResponse {
    meta: Option<KitsuMeta>,
}

#[derive(Debug, Deserialize)]
struct KitsuMeta {
    imdb_id: Option<String>,
    #[serde(default)]
    videos: Vec<KitsuVideo>,
}

#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
struct KitsuVideo {
    id: String,
    imdb_id: Option<String>,
    imdbSeason: Option<u32>,
    imdbEpisode: Option<u32>,
    season: Option<u32>,
}

impl KitsuMapper {
    pub fn new(config: &MetadataConfig) -> Result<Self, MetaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.kitsu_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdMapper for KitsuMapper {
    fn handles(&self, id: &str) -> bool {
        id.starts_with(KITSU_PREFIX)
    }

    async fn translate(&self, alternate_id: &str) -> Result<String, MetaError> {
        let (kitsu_id, episode) = split_kitsu_id(alternate_id)?;
        let url = format!("{}/meta/anime/kitsu:{}.json", self.base_url, kitsu_id);
        debug!(kitsu_id = %kitsu_id, ?episode, "Kitsu lookup");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MetaError::NotFound(alternate_id.to_string()));
        }
        if !status.is_success() {
            return Err(MetaError::ApiError {
                status: status.as_u16(),
                message: format!("kitsu lookup for {} failed", alternate_id),
            });
        }

        let body: KitsuResponse = response
            .json()
            .await
            .map_err(|e| MetaError::ParseError(e.to_string()))?;
        let meta = body
            .meta
            .ok_or_else(|| MetaError::NotFound(alternate_id.to_string()))?;

        canonical_id(&kitsu_id, episode, &meta)
            .ok_or_else(|| MetaError::NotFound(format!("no IMDb mapping for {}", alternate_id)))
    }
}

/// `kitsu:1376:12` -> ("1376", Some(12)).
fn split_kitsu_id(id: &str) -> Result<(String, Option<u32>), MetaError> {
    let rest = id
        .strip_prefix(KITSU_PREFIX)
        .ok_or_else(|| MetaError::ParseError(format!("not a kitsu id: {}", id)))?;
    let mut fields = rest.split(':');
    let kitsu_id = fields
        .next()
        .filter(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| MetaError::ParseError(format!("invalid kitsu id: {}", id)))?;
    let episode = fields.next().and_then(|e| e.parse().ok());
    Ok((kitsu_id.to_string(), episode))
}

fn canonical_id(kitsu_id: &str, episode: Option<u32>, meta: &KitsuMeta) -> Option<String> {
    let Some(episode) = episode else {
        return meta.imdb_id.clone();
    };

    let video_id = format!("kitsu:{}:{}", kitsu_id, episode);
    let video = meta.videos.iter().find(|v| v.id == video_id);
    let imdb = video
        .and_then(|v| v.imdb_id.clone())
        .or_else(|| meta.imdb_id.clone())?;

    let season = video.and_then(|v| v.imdbSeason).unwrap_or(1);
    let imdb_episode = video.and_then(|v| v.imdbEpisode).unwrap_or(episode);
    let absolute_season = video.and_then(|v| v.season).unwrap_or(1);

    Some(format!(
        "{}:{}:{}:{}:{}:true",
        imdb, season, imdb_episode, absolute_season, episode
    ))
}
