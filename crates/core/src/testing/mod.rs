//! Testing utilities and mock implementations for pipeline tests.
//!
//! Every collaborator of the resolver has a mock here, so the whole
//! pipeline can run without Jackett, a torrent swarm or metadata services.
//!
//! # Example
//!
//! ```rust,ignore
//! use godon_core::testing::{MockSearcher, MockInspector, MockMetadataProvider, fixtures};
//!
//! let searcher = MockSearcher::new();
//! let inspector = MockInspector::new();
//! let metadata = MockMetadataProvider::new();
//!
//! searcher.set_results(vec![fixtures::candidate("Show S01E05", "abc", 10)]).await;
//! inspector.set_files("magnet:?xt=urn:btih:abc", fixtures::file_list(&["Show.S01E05.mkv"])).await;
//! metadata.set_meta("tt1", TitleMeta::new("Show", "2011")).await;
//! ```

mod mock_inspector;
mod mock_metadata;
mod mock_searcher;

pub use mock_inspector::MockInspector;
pub use mock_metadata::{MockIdMapper, MockMetadataProvider};
pub use mock_searcher::{MockSearcher, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::StreamsConfig;
    use crate::content::{ResolvedCandidate, TorrentFile, TorrentFileList};
    use crate::searcher::Candidate;
    use crate::streams::{BehaviorHints, StreamDescriptor};

    /// Magnet URI used by `candidate` for `info_hash`.
    pub fn magnet(info_hash: &str) -> String {
        format!("magnet:?xt=urn:btih:{}", info_hash)
    }

    /// Create a test candidate with a magnet source.
    pub fn candidate(title: &str, info_hash: &str, peers: u64) -> Candidate {
        Candidate {
            title: title.to_string(),
            info_hash: Some(info_hash.to_string()),
            source_uri: magnet(info_hash),
            peer_count: peers,
        }
    }

    /// Create a file listing from paths, 700 MB each.
    pub fn file_list(paths: &[&str]) -> TorrentFileList {
        TorrentFileList {
            name: "fixture".to_string(),
            info_hash: None,
            files: paths
                .iter()
                .map(|p| TorrentFile {
                    path: p.to_string(),
                    size_bytes: 700 * 1024 * 1024,
                })
                .collect(),
        }
    }

    /// A candidate already paired with its listing.
    pub fn resolved(title: &str, info_hash: &str, paths: &[&str]) -> ResolvedCandidate {
        ResolvedCandidate {
            candidate: candidate(title, info_hash, 1),
            files: file_list(paths),
        }
    }

    /// A descriptor with the default hints for "tt1".
    pub fn stream(title: &str, info_hash: &str, file_index: usize) -> StreamDescriptor {
        let config = StreamsConfig::default();
        StreamDescriptor {
            title: title.to_string(),
            info_hash: info_hash.to_string(),
            file_index,
            behavior_hints: BehaviorHints {
                binge_group: format!("{}tt1", config.binge_group_prefix),
                country_whitelist: config.country_whitelist,
            },
        }
    }
}
