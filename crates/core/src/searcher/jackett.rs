//! Jackett search backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::JackettConfig;

use super::{parse_peer_count, Candidate, SearchCategory, SearchError, SearchQuery, Searcher};

/// Jackett search backend implementation.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the Jackett API URL for a search.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/{}/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.indexer),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&query.query)
        );

        for cat in &query.categories {
            for cat_id in category_to_jackett_ids(cat) {
                url.push_str(&format!("&Category[]={}", cat_id));
            }
        }

        url
    }
}

#[async_trait]
impl Searcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
        let start = Instant::now();
        let url = self.build_search_url(query);
        debug!(indexer = %self.config.indexer, query = %query.query, "Searching Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse response: {}", e)))?;

        let candidates: Vec<Candidate> = jackett_response
            .Results
            .into_iter()
            .filter_map(JackettResult::into_candidate)
            .collect();

        debug!(
            query = %query.query,
            results = candidates.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Jackett search complete"
        );

        Ok(candidates)
    }
}

/// Map our categories to Torznab category IDs.
fn category_to_jackett_ids(cat: &SearchCategory) -> Vec<i32> {
    match cat {
        SearchCategory::Movies => vec![2000], // Movies
        SearchCategory::Tv => vec![5000],     // TV
        SearchCategory::Anime => vec![5070],  // TV/Anime
    }
}

/// Jackett numbers are usually JSON integers but some indexers send strings.
fn peers_from_value(value: Option<serde_json::Value>) -> u64 {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => parse_peer_count(&s),
        _ => 0,
    }
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    Link: Option<String>,
    InfoHash: Option<String>,
    Peers: Option<serde_json::Value>,
}

impl JackettResult {
    /// Results without any magnet or link cannot be inspected and are skipped.
    fn into_candidate(self) -> Option<Candidate> {
        let source_uri = self
            .MagnetUri
            .filter(|m| !m.is_empty())
            .or(self.Link.filter(|l| !l.is_empty()))?;

        Some(Candidate {
            title: self.Title,
            info_hash: self
                .InfoHash
                .filter(|h| !h.is_empty())
                .map(|h| h.to_lowercase()),
            source_uri,
            peer_count: peers_from_value(self.Peers),
        })
    }
}
