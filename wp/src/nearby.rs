//! Per-stop nearby discovery
//!
//! Groups nearby places by the stop that anchors them. Discovery is
//! cancellable the same way leg resolution is: a run superseded by a
//! newer stop set yields nothing rather than stale groups.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};
use tripstore::Stop;

use crate::clients::{Language, NearbyClient, NearbyPlace};

/// At most this many stops are queried per discovery run
const MAX_STOPS_PER_RUN: usize = 5;

/// Nearby places anchored to one stop
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyGroup {
    pub stop: Stop,
    pub places: Vec<NearbyPlace>,
}

/// Discovers nearby places for the leading stops of the trip
pub struct NearbyFinder {
    client: Arc<dyn NearbyClient>,
    generation: AtomicU64,
}

impl NearbyFinder {
    /// Create a finder over a nearby-discovery collaborator
    pub fn new(client: Arc<dyn NearbyClient>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
        }
    }

    /// Discover places around the first few stops.
    ///
    /// A per-stop failure degrades to an empty group for that stop; a run
    /// superseded by a newer one returns `None` so stale groups never
    /// reach the caller.
    pub async fn discover(
        &self,
        stops: &[Stop],
        radius_meters: u32,
        language: Language,
    ) -> Option<Vec<NearbyGroup>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let active = &stops[..stops.len().min(MAX_STOPS_PER_RUN)];
        debug!(generation, stop_count = active.len(), "discover: called");

        let mut groups = Vec::with_capacity(active.len());
        for stop in active {
            let places = match self.client.nearby(stop, radius_meters, language).await {
                Ok(places) => places,
                Err(e) => {
                    warn!(stop_id = %stop.id, error = %e, "discover: lookup failed, empty group");
                    Vec::new()
                }
            };

            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "discover: superseded, dropping run");
                return None;
            }
            groups.push(NearbyGroup {
                stop: stop.clone(),
                places,
            });
        }

        Some(groups)
    }

    /// Invalidate any in-flight discovery run
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Category;
    use async_trait::async_trait;
    use eyre::Result;

    struct FixedNearby {
        fail_for: Option<String>,
    }

    #[async_trait]
    impl NearbyClient for FixedNearby {
        async fn nearby(&self, stop: &Stop, _radius: u32, _language: Language) -> Result<Vec<NearbyPlace>> {
            if self.fail_for.as_deref() == Some(stop.id.as_str()) {
                eyre::bail!("interpreter busy");
            }
            Ok(vec![NearbyPlace {
                id: format!("poi-{}", stop.id),
                name: format!("Near {}", stop.name),
                category: Category::Attraction,
                distance_km: 1.2,
                lat: stop.lat,
                lng: stop.lng,
            }])
        }
    }

    fn stops(n: usize) -> Vec<Stop> {
        (0..n)
            .map(|i| Stop::new(format!("s{i}"), format!("Stop {i}"), 6.0, 80.0))
            .collect()
    }

    #[tokio::test]
    async fn test_discover_groups_per_stop() {
        let finder = NearbyFinder::new(Arc::new(FixedNearby { fail_for: None }));
        let groups = finder.discover(&stops(3), 3000, Language::En).await.unwrap();

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].places[0].id, "poi-s1");
    }

    #[tokio::test]
    async fn test_discover_caps_at_five_stops() {
        let finder = NearbyFinder::new(Arc::new(FixedNearby { fail_for: None }));
        let groups = finder.discover(&stops(8), 3000, Language::En).await.unwrap();
        assert_eq!(groups.len(), 5);
    }

    #[tokio::test]
    async fn test_per_stop_failure_degrades_to_empty_group() {
        let finder = NearbyFinder::new(Arc::new(FixedNearby {
            fail_for: Some("s1".to_string()),
        }));
        let groups = finder.discover(&stops(3), 3000, Language::En).await.unwrap();

        assert_eq!(groups.len(), 3);
        assert!(!groups[0].places.is_empty());
        assert!(groups[1].places.is_empty());
        assert!(!groups[2].places.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_drops_run() {
        let finder = NearbyFinder::new(Arc::new(FixedNearby { fail_for: None }));
        finder.cancel();
        // A fresh call after cancel still works
        assert!(finder.discover(&stops(1), 3000, Language::En).await.is_some());
    }
}
