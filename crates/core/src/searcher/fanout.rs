//! Concurrent indexer fan-out.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{Candidate, SearchQuery, Searcher};
use crate::metrics::INDEXER_QUERIES;
use crate::query::QueryVariant;

/// Run one search per variant concurrently and wait for all of them.
///
/// Each call is bounded by `per_call`. A failed or timed-out call
/// contributes nothing and is not retried. Every call owns its own result
/// slot; slots are concatenated in variant order once all calls finished.
pub async fn search_all(
    searcher: &dyn Searcher,
    variants: &[QueryVariant],
    per_call: Duration,
) -> Vec<Candidate> {
    let calls = variants.iter().map(|variant| async move {
        let query = SearchQuery::from(variant);
        match tokio::time::timeout(per_call, searcher.search(&query)).await {
            Ok(Ok(found)) => {
                INDEXER_QUERIES.with_label_values(&["ok"]).inc();
                debug!(query = %query.query, results = found.len(), "Variant searched");
                found
            }
            Ok(Err(e)) => {
                INDEXER_QUERIES.with_label_values(&["error"]).inc();
                warn!(searcher = searcher.name(), query = %query.query, error = %e, "Variant search failed");
                Vec::new()
            }
            Err(_) => {
                INDEXER_QUERIES.with_label_values(&["timeout"]).inc();
                warn!(searcher = searcher.name(), query = %query.query, "Variant search timed out");
                Vec::new()
            }
        }
    });

    let slots: Vec<Vec<Candidate>> = join_all(calls).await;
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::SearchError;
    use crate::selector::MediaType;
    use crate::testing::{fixtures, MockSearcher};

    fn variants(queries: &[&str]) -> Vec<QueryVariant> {
        queries
            .iter()
            .map(|q| QueryVariant {
                query: q.to_string(),
                media_type: MediaType::Series,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_search_all_concatenates_in_variant_order() {
        let searcher = MockSearcher::new();
        searcher
            .set_query_handler(|q| match q {
                "Show S01" => Some(vec![fixtures::candidate("pack", "p1", 5)]),
                "Show S01E02" => Some(vec![
                    fixtures::candidate("ep a", "e1", 1),
                    fixtures::candidate("ep b", "e2", 2),
                ]),
                _ => None,
            })
            .await;

        let found = search_all(
            &searcher,
            &variants(&["Show S01", "Show batch", "Show S01E02"]),
            Duration::from_secs(5),
        )
        .await;

        let titles: Vec<_> = found.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["pack", "ep a", "ep b"]);

        let recorded = searcher.recorded_searches().await;
        assert_eq!(recorded.len(), 3);
        assert!(recorded.iter().all(|r| r.query.categories == vec![
            crate::searcher::SearchCategory::Tv
        ]));
    }

    #[tokio::test]
    async fn test_failed_variant_contributes_nothing() {
        let searcher = MockSearcher::new();
        searcher
            .set_query_handler(|q| match q {
                "ok" => Some(vec![fixtures::candidate("found", "h1", 1)]),
                _ => None,
            })
            .await;
        searcher
            .fail_query("broken", SearchError::ConnectionFailed("refused".into()))
            .await;

        let found = search_all(&searcher, &variants(&["broken", "ok"]), Duration::from_secs(5)).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "found");
    }

    #[tokio::test]
    async fn test_slow_variant_times_out_without_blocking_others() {
        let searcher = MockSearcher::new();
        searcher
            .set_query_handler(|_| Some(vec![fixtures::candidate("any", "h", 1)]))
            .await;
        searcher.delay_query("slow", Duration::from_secs(30)).await;

        let found = search_all(
            &searcher,
            &variants(&["slow", "fast one", "fast two"]),
            Duration::from_millis(50),
        )
        .await;
        assert_eq!(found.len(), 2);
    }
}
