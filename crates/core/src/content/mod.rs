//! Torrent content resolution.
//!
//! A `ContentInspector` reads the file listing of a candidate from its
//! metadata, without downloading any payload. `resolve_contents` runs one
//! inspection per candidate concurrently and keeps the ones that produced
//! a non-empty listing.

mod inspector;
mod torrent_parser;
mod types;

pub use inspector::TorrentInspector;
pub use torrent_parser::{parse_torrent_bytes, TorrentParseError};
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::CONTENT_RESOLUTIONS;
use crate::searcher::Candidate;

/// Errors that can occur while listing torrent contents.
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    #[error("HTTP fetch failed: {0}")]
    Http(String),

    #[error(transparent)]
    Torrent(#[from] TorrentParseError),

    #[error("Torrent session error: {0}")]
    Session(String),

    #[error("Timed out listing torrent contents")]
    Timeout,

    #[error("Torrent has no files")]
    Empty,

    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Reads the file listing behind a magnet link or .torrent URL.
#[async_trait]
pub trait ContentInspector: Send + Sync {
    async fn list_files(&self, source_uri: &str) -> Result<TorrentFileList, ContentError>;
}

/// A candidate together with its file listing.
#[derive(Debug, Clone)]
pub struct ResolvedCandidate {
    pub candidate: Candidate,
    pub files: TorrentFileList,
}

/// List the files of every candidate concurrently.
///
/// Waits for all inspections. Failures, timeouts and empty listings are
/// dropped. Output keeps the input order.
pub async fn resolve_contents(
    inspector: &dyn ContentInspector,
    candidates: Vec<Candidate>,
    per_call: Duration,
) -> Vec<ResolvedCandidate> {
    let inspections = candidates.into_iter().map(|candidate| async move {
        let source = if candidate.is_magnet() { "magnet" } else { "torrent" };
        let outcome = tokio::time::timeout(per_call, inspector.list_files(&candidate.source_uri))
            .await
            .unwrap_or(Err(ContentError::Timeout))
            .and_then(|files| {
                if files.is_empty() {
                    Err(ContentError::Empty)
                } else {
                    Ok(files)
                }
            });

        match outcome {
            Ok(files) => {
                CONTENT_RESOLUTIONS.with_label_values(&[source, "ok"]).inc();
                debug!(title = %candidate.title, files = files.files.len(), "Listed torrent files");
                Some(ResolvedCandidate { candidate, files })
            }
            Err(e) => {
                let label = match &e {
                    ContentError::Timeout => "timeout",
                    ContentError::Empty => "empty",
                    _ => "error",
                };
                CONTENT_RESOLUTIONS.with_label_values(&[source, label]).inc();
                warn!(title = %candidate.title, error = %e, "Dropping candidate");
                None
            }
        }
    });

    join_all(inspections).await.into_iter().flatten().collect()
}
