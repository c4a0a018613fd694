//! Real content inspector backed by librqbit and reqwest.
//!
//! Magnet links are added to an embedded librqbit session in list-only
//! mode, which fetches the info dictionary from peers and stops there.
//! Everything else is treated as a .torrent URL and fetched over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, Session, SessionOptions};
use reqwest::{header::LOCATION, redirect, Client};
use tracing::{debug, info};

use super::{parse_torrent_bytes, ContentError, ContentInspector, TorrentFileList};
use crate::config::ContentConfig;
use crate::searcher::is_magnet_uri;

const MAX_REDIRECTS: usize = 10;

/// Lists torrent contents from magnets and .torrent URLs.
pub struct TorrentInspector {
    http: Client,
    session: Arc<Session>,
}

impl TorrentInspector {
    /// Start the librqbit session and build the HTTP client.
    pub async fn new(config: &ContentConfig, fetch_timeout: Duration) -> Result<Self, ContentError> {
        let http = Client::builder()
            .timeout(fetch_timeout)
            .redirect(magnet_aware_redirects())
            .build()
            .map_err(|e| ContentError::Http(format!("Failed to create HTTP client: {}", e)))?;

        tokio::fs::create_dir_all(&config.session_dir)
            .await
            .map_err(|e| {
                ContentError::Session(format!(
                    "Failed to create session directory {:?}: {}",
                    config.session_dir, e
                ))
            })?;

        let mut opts = SessionOptions::default();
        opts.disable_dht = config.disable_dht;
        if let (Some(start), Some(end)) = (config.listen_port_start, config.listen_port_end) {
            opts.listen_port_range = Some(start..end.saturating_add(1));
        }

        info!(
            session_dir = ?config.session_dir,
            dht_enabled = !opts.disable_dht,
            "Initializing librqbit session"
        );

        let session = Session::new_with_opts(config.session_dir.clone(), opts)
            .await
            .map_err(|e| ContentError::Session(format!("Failed to create session: {}", e)))?;

        Ok(Self { http, session })
    }

    async fn list_magnet(&self, magnet: &str) -> Result<TorrentFileList, ContentError> {
        debug!(magnet = %magnet, "Listing magnet contents");
        let response = self
            .session
            .add_torrent(
                AddTorrent::from_url(magnet),
                Some(AddTorrentOptions {
                    list_only: true,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| ContentError::Session(e.to_string()))?;

        match response {
            AddTorrentResponse::ListOnly(list) => Ok(parse_torrent_bytes(&list.torrent_bytes)?),
            // list_only never adds, but an already managed torrent is answered as such
            AddTorrentResponse::Added(..) | AddTorrentResponse::AlreadyManaged(..) => Err(
                ContentError::Session("torrent unexpectedly added to session".to_string()),
            ),
        }
    }

    async fn fetch_torrent(&self, url: &str) -> Result<TorrentFileList, ContentError> {
        debug!(url = %url, "Fetching .torrent");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_redirection() {
            // Jackett download links often redirect to a magnet
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return match location {
                Some(target) if is_magnet_uri(&target) => self.list_magnet(&target).await,
                Some(target) => Err(ContentError::Unsupported(format!(
                    "redirect to {}",
                    target
                ))),
                None => Err(ContentError::Http(format!("HTTP {} without location", status))),
            };
        }

        if !status.is_success() {
            return Err(ContentError::Http(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ContentError::Http(e.to_string()))?;
        Ok(parse_torrent_bytes(&bytes)?)
    }
}

#[async_trait]
impl ContentInspector for TorrentInspector {
    async fn list_files(&self, source_uri: &str) -> Result<TorrentFileList, ContentError> {
        if is_magnet_uri(source_uri) {
            self.list_magnet(source_uri).await
        } else if source_uri.starts_with("http://") || source_uri.starts_with("https://") {
            self.fetch_torrent(source_uri).await
        } else {
            Err(ContentError::Unsupported(source_uri.to_string()))
        }
    }
}

/// Follow HTTP redirects, but hand `magnet:` targets back to the caller.
fn magnet_aware_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.url().scheme() == "magnet" {
            attempt.stop()
        } else if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}
