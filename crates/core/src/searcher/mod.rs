//! Torrent search abstraction.
//!
//! This module provides a `Searcher` trait for searching torrents on an
//! indexer backend (Jackett), the concurrent per-variant fan-out, and the
//! dedup/rank/cap step applied to the aggregated candidates.

mod dedup;
mod fanout;
mod jackett;
mod types;

pub use dedup::{cap_candidates, dedupe_candidates, rank_candidates, sort_by_peers};
pub use fanout::search_all;
pub use jackett::JackettSearcher;
pub use types::*;
