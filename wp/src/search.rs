//! Debounced, cancellable place search
//!
//! One search is in flight per searcher at most conceptually; a newer
//! query supersedes any older one. Supersession is checked both after the
//! debounce window and after the network call, so a cancelled search
//! cannot surface results or mutate caller state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::clients::{GeocodeClient, Language, PlaceMatch};
use crate::config::SearchConfig;

/// Debouncing front-end over a geocoding client.
///
/// Returns `Some(results)` for a search that ran to completion and is
/// still the newest, `None` for one that was superseded mid-flight.
/// Queries shorter than 2 trimmed characters complete immediately with
/// no results and no network call.
pub struct PlaceSearcher {
    client: Arc<dyn GeocodeClient>,
    debounce: Duration,
    generation: AtomicU64,
}

impl PlaceSearcher {
    /// Create a searcher over a geocoding collaborator
    pub fn new(client: Arc<dyn GeocodeClient>, config: &SearchConfig) -> Self {
        Self {
            client,
            debounce: Duration::from_millis(config.debounce_ms),
            generation: AtomicU64::new(0),
        }
    }

    /// Search for places matching the query.
    ///
    /// Failures degrade to an empty result list - search is a
    /// best-effort surface, not an error channel.
    pub async fn search(&self, query: &str, language: Language) -> Option<Vec<PlaceMatch>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let trimmed = query.trim();
        if trimmed.chars().count() < 2 {
            return Some(Vec::new());
        }

        debug!(generation, query = %trimmed, "search: debouncing");
        tokio::time::sleep(self.debounce).await;
        if self.is_superseded(generation) {
            debug!(generation, "search: superseded during debounce");
            return None;
        }

        let results = match self.client.search(trimmed, language).await {
            Ok(results) => results,
            Err(e) => {
                debug!(generation, error = %e, "search: client failed, degrading to empty");
                Vec::new()
            }
        };

        if self.is_superseded(generation) {
            debug!(generation, "search: superseded during request");
            return None;
        }
        Some(results)
    }

    /// Invalidate any in-flight search without starting a new one
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eyre::Result;
    use tokio::sync::Mutex;

    struct ScriptedGeocoder {
        responses: Mutex<Vec<Result<Vec<PlaceMatch>>>>,
    }

    impl ScriptedGeocoder {
        fn new(responses: Vec<Result<Vec<PlaceMatch>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl GeocodeClient for ScriptedGeocoder {
        async fn search(&self, _query: &str, _language: Language) -> Result<Vec<PlaceMatch>> {
            self.responses.lock().await.remove(0)
        }
    }

    fn matches(names: &[&str]) -> Vec<PlaceMatch> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| PlaceMatch {
                id: i.to_string(),
                name: name.to_string(),
                lat: 6.0,
                lng: 80.0,
            })
            .collect()
    }

    fn searcher(client: Arc<dyn GeocodeClient>) -> PlaceSearcher {
        PlaceSearcher::new(client, &SearchConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_returns_empty_without_call() {
        // An empty script would panic if the client were called
        let client = Arc::new(ScriptedGeocoder::new(vec![]));
        let searcher = searcher(client);

        assert_eq!(searcher.search(" g ", Language::En).await, Some(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_returns_results() {
        let client = Arc::new(ScriptedGeocoder::new(vec![Ok(matches(&["Galle Fort"]))]));
        let searcher = searcher(client);

        let results = searcher.search("galle", Language::En).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Galle Fort");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_supersedes_older() {
        // Only the surviving search reaches the client
        let client = Arc::new(ScriptedGeocoder::new(vec![Ok(matches(&["fresh"]))]));
        let searcher = Arc::new(searcher(client));

        // Both debounce; the second takes the newer generation, so the
        // first must come back cancelled
        let (old, new) = tokio::join!(
            searcher.search("gal", Language::En),
            searcher.search("galle", Language::En)
        );

        assert!(old.is_none());
        let new = new.unwrap();
        assert_eq!(new[0].name, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates_in_flight_search() {
        let client = Arc::new(ScriptedGeocoder::new(vec![Ok(matches(&["x"]))]));
        let searcher = Arc::new(searcher(client));

        let pending = {
            let searcher = Arc::clone(&searcher);
            tokio::spawn(async move { searcher.search("kandy", Language::En).await })
        };
        tokio::task::yield_now().await;
        searcher.cancel();

        assert!(pending.await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_failure_degrades_to_empty() {
        let client = Arc::new(ScriptedGeocoder::new(vec![Err(eyre::eyre!("timeout"))]));
        let searcher = searcher(client);

        assert_eq!(searcher.search("ella", Language::En).await, Some(Vec::new()));
    }
}
