use serde::{Deserialize, Serialize};

/// A file within a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// Path within the torrent, without the root folder.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// File listing read from a torrent's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFileList {
    /// Torrent name (root folder, or file name for single-file torrents).
    pub name: String,
    /// Info hash computed from the metadata, lowercase hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    /// Files in torrent order. A file's index is its position plus one.
    pub files: Vec<TorrentFile>,
}

impl TorrentFileList {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
