//! Deduplication, ranking and capping of search candidates.

use std::collections::HashSet;

use super::Candidate;

/// Remove duplicate candidates, keeping the first occurrence.
///
/// Identity is the info hash, or the title when the indexer did not report
/// a hash. Title identity is a heuristic: unrelated releases sharing a
/// generic title collapse into one.
pub fn dedupe_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.identity_key().to_string()))
        .collect()
}

/// Sort by peer count, highest first. Ties keep discovery order.
pub fn sort_by_peers(candidates: &mut [Candidate]) {
    // slice::sort_by is stable
    candidates.sort_by(|a, b| b.peer_count.cmp(&a.peer_count));
}

/// Truncate to `cap` entries when a cap is set.
pub fn cap_candidates(candidates: &mut Vec<Candidate>, cap: Option<usize>) {
    if let Some(cap) = cap.filter(|c| *c > 0) {
        candidates.truncate(cap);
    }
}

/// Dedupe, sort and cap in one step.
pub fn rank_candidates(candidates: Vec<Candidate>, cap: Option<usize>) -> Vec<Candidate> {
    let mut ranked = dedupe_candidates(candidates);
    sort_by_peers(&mut ranked);
    cap_candidates(&mut ranked, cap);
    ranked
}
