//! Stream descriptors returned to the Stremio client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StreamsConfig;
use crate::content::ResolvedCandidate;
use crate::matcher::MatchedFile;

/// One playable stream, in the Stremio stream object shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub title: String,
    pub info_hash: String,
    /// 1-based file position inside the torrent.
    #[serde(rename = "fileIdx")]
    pub file_index: usize,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    /// Streams sharing a group are played back to back.
    pub binge_group: String,
    pub country_whitelist: Vec<String>,
}

/// Binge group shared by every episode of `base_id`.
pub fn binge_group(config: &StreamsConfig, base_id: &str) -> String {
    format!("{}{}", config.binge_group_prefix, base_id)
}

/// Build descriptors in candidate order.
///
/// The indexer's info hash wins; the one read from the torrent metadata
/// fills in when the indexer had none. Entries with no hash at all are
/// not playable and are skipped.
pub fn assemble_streams(
    base_id: &str,
    matches: Vec<(ResolvedCandidate, MatchedFile)>,
    config: &StreamsConfig,
) -> Vec<StreamDescriptor> {
    let group = binge_group(config, base_id);

    matches
        .into_iter()
        .filter_map(|(resolved, file)| {
            let ResolvedCandidate { candidate, files } = resolved;
            let Some(info_hash) = candidate
                .info_hash
                .filter(|h| !h.is_empty())
                .or(files.info_hash)
            else {
                debug!(title = %candidate.title, "Skipping stream without info hash");
                return None;
            };

            Some(StreamDescriptor {
                title: candidate.title,
                info_hash,
                file_index: file.file_index,
                behavior_hints: BehaviorHints {
                    binge_group: group.clone(),
                    country_whitelist: config.country_whitelist.clone(),
                },
            })
        })
        .collect()
}
