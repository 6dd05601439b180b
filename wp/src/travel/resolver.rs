//! Travel-leg resolver with last-requested-wins semantics
//!
//! Multiple resolutions can be in flight when the order changes quickly.
//! Each call takes a fresh generation number; only a completion whose
//! generation is still current may write the shared slot, so a slow stale
//! response can never clobber a fresher one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, warn};
use tripstore::Stop;

use super::TravelLegs;
use crate::clients::RoutingClient;
use crate::config::DurationPolicy;

/// Resolves buffered travel legs for an ordered stop sequence.
///
/// Never errors past its boundary: every failure mode (network, bad
/// status, malformed payload, empty legs) degrades to `None`, which
/// callers treat as "not yet known" rather than "zero travel".
pub struct TravelLegResolver {
    client: Arc<dyn RoutingClient>,
    policy: DurationPolicy,
    generation: AtomicU64,
    current: Mutex<Option<TravelLegs>>,
}

impl TravelLegResolver {
    /// Create a resolver over a routing collaborator
    pub fn new(client: Arc<dyn RoutingClient>, policy: DurationPolicy) -> Self {
        Self {
            client,
            policy,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Resolve legs for the ordered stops.
    ///
    /// Returns the buffered legs, or `None` when there is nothing to
    /// compute (fewer than 2 stops), the routing call failed, or this
    /// request was superseded by a newer one before completing.
    pub async fn resolve(&self, ordered: &[Stop]) -> Option<TravelLegs> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, stop_count = ordered.len(), "resolve: called");

        if ordered.len() < 2 {
            // No legs to compute - clear the slot so stale legs from a
            // longer order do not linger
            self.commit(generation, None).await;
            return None;
        }

        let outcome = match self.client.route(ordered).await {
            Ok(raw) => {
                if raw.durations_seconds.is_empty() {
                    warn!(generation, "resolve: routing returned no legs");
                    None
                } else {
                    Some(TravelLegs::from_raw(&raw, &self.policy))
                }
            }
            Err(e) => {
                warn!(generation, error = %e, "resolve: routing call failed");
                None
            }
        };

        if self.commit(generation, outcome.clone()).await {
            outcome
        } else {
            debug!(generation, "resolve: superseded, result dropped");
            None
        }
    }

    /// Latest committed legs, `None` while unresolved
    pub async fn current(&self) -> Option<TravelLegs> {
        self.current.lock().await.clone()
    }

    /// Drop any resolved legs (used when the plan is cleared)
    pub async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().await = None;
    }

    /// Write the slot if this generation is still the newest
    async fn commit(&self, generation: u64, value: Option<TravelLegs>) -> bool {
        let mut slot = self.current.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::RouteLegs;
    use async_trait::async_trait;
    use eyre::{Result, bail};
    use std::time::Duration;

    /// Routing stub whose per-call delay and payload are scripted up front
    struct ScriptedRouting {
        calls: Mutex<Vec<(Duration, Result<RouteLegs>)>>,
    }

    impl ScriptedRouting {
        fn new(calls: Vec<(Duration, Result<RouteLegs>)>) -> Self {
            Self {
                calls: Mutex::new(calls),
            }
        }
    }

    #[async_trait]
    impl RoutingClient for ScriptedRouting {
        async fn route(&self, _stops: &[Stop]) -> Result<RouteLegs> {
            let (delay, outcome) = self.calls.lock().await.remove(0);
            tokio::time::sleep(delay).await;
            outcome
        }
    }

    fn stops(n: usize) -> Vec<Stop> {
        (0..n)
            .map(|i| Stop::new(format!("s{i}"), format!("Stop {i}"), 6.0 + i as f64, 80.0))
            .collect()
    }

    fn raw_legs(seconds: &[f64]) -> RouteLegs {
        RouteLegs {
            durations_seconds: seconds.to_vec(),
            distances_meters: seconds.iter().map(|s| s * 10.0).collect(),
        }
    }

    #[tokio::test]
    async fn test_single_stop_resolves_to_none() {
        let client = Arc::new(ScriptedRouting::new(vec![]));
        let resolver = TravelLegResolver::new(client, DurationPolicy::default());

        assert!(resolver.resolve(&stops(1)).await.is_none());
        assert!(resolver.current().await.is_none());
    }

    #[tokio::test]
    async fn test_success_commits_legs() {
        let client = Arc::new(ScriptedRouting::new(vec![(
            Duration::ZERO,
            Ok(raw_legs(&[1200.0, 900.0])),
        )]));
        let resolver = TravelLegResolver::new(client, DurationPolicy::default());

        let legs = resolver.resolve(&stops(3)).await.unwrap();
        assert_eq!(legs.leg_minutes, vec![26, 20]);
        assert_eq!(resolver.current().await.unwrap(), legs);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_none() {
        let client = Arc::new(ScriptedRouting::new(vec![(Duration::ZERO, bail_err())]));
        let resolver = TravelLegResolver::new(client, DurationPolicy::default());

        assert!(resolver.resolve(&stops(2)).await.is_none());
        assert!(resolver.current().await.is_none());
    }

    fn bail_err() -> Result<RouteLegs> {
        bail!("connection refused")
    }

    #[tokio::test]
    async fn test_last_requested_wins_over_slow_stale_response() {
        // First call is slow, second is fast; the slow completion must
        // not overwrite the newer result
        let client = Arc::new(ScriptedRouting::new(vec![
            (Duration::from_millis(200), Ok(raw_legs(&[6000.0]))),
            (Duration::from_millis(10), Ok(raw_legs(&[600.0]))),
        ]));
        let resolver = Arc::new(TravelLegResolver::new(client, DurationPolicy::default()));

        let order_a = stops(2);
        let order_b = stops(2);
        let (a, b) = tokio::join!(resolver.resolve(&order_a), resolver.resolve(&order_b));

        // A was superseded; B's figures are the observable state
        assert!(a.is_none());
        let b = b.unwrap();
        assert_eq!(b.leg_minutes, vec![13]);
        assert_eq!(resolver.current().await.unwrap().leg_minutes, vec![13]);
    }

    #[tokio::test]
    async fn test_newer_failure_still_wins_over_stale_success() {
        let client = Arc::new(ScriptedRouting::new(vec![
            (Duration::from_millis(200), Ok(raw_legs(&[6000.0]))),
            (Duration::from_millis(10), bail_err()),
        ]));
        let resolver = Arc::new(TravelLegResolver::new(client, DurationPolicy::default()));

        let order_a = stops(2);
        let order_b = stops(2);
        let (a, b) = tokio::join!(resolver.resolve(&order_a), resolver.resolve(&order_b));

        assert!(a.is_none());
        assert!(b.is_none());
        // The stale success must not have leaked into the slot
        assert!(resolver.current().await.is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_slot() {
        let client = Arc::new(ScriptedRouting::new(vec![(
            Duration::ZERO,
            Ok(raw_legs(&[600.0])),
        )]));
        let resolver = TravelLegResolver::new(client, DurationPolicy::default());

        resolver.resolve(&stops(2)).await;
        assert!(resolver.current().await.is_some());
        resolver.reset().await;
        assert!(resolver.current().await.is_none());
    }
}
