//! Torrent file parser - extracts file listings from .torrent files.
//!
//! Uses librqbit-core to parse bencoded .torrent data and extract
//! the file listing (paths and sizes) without needing to download anything.

use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};
use thiserror::Error;

use super::{TorrentFile, TorrentFileList};

/// Errors that can occur when parsing torrent files.
#[derive(Debug, Clone, Error)]
pub enum TorrentParseError {
    #[error("Failed to parse torrent: {0}")]
    ParseError(String),

    #[error("Empty torrent (no files)")]
    EmptyTorrent,
}

/// Parse a .torrent file into its file listing.
///
/// Multi-file paths are relative to the torrent root folder, so the root
/// name never takes part in episode matching. Single-file torrents list
/// the torrent name as their only path.
pub fn parse_torrent_bytes(bytes: &[u8]) -> Result<TorrentFileList, TorrentParseError> {
    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| TorrentParseError::ParseError(e.to_string()))?;

    let info = &torrent.info;

    let name = info
        .name
        .as_ref()
        .map(|b| bytes_to_string(b.as_ref()))
        .unwrap_or_else(|| "unknown".to_string());

    let files = if let Some(ref files) = info.files {
        files
            .iter()
            .map(|file| TorrentFile {
                path: file
                    .path
                    .iter()
                    .map(|part| bytes_to_string(part.as_ref()))
                    .collect::<Vec<_>>()
                    .join("/"),
                size_bytes: file.length,
            })
            .collect::<Vec<_>>()
    } else if let Some(length) = info.length {
        vec![TorrentFile {
            path: name.clone(),
            size_bytes: length,
        }]
    } else {
        Vec::new()
    };

    if files.is_empty() {
        return Err(TorrentParseError::EmptyTorrent);
    }

    Ok(TorrentFileList {
        name,
        info_hash: Some(torrent.info_hash.as_string()),
        files,
    })
}

/// Convert bytes to a UTF-8 string, replacing invalid sequences.
fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
