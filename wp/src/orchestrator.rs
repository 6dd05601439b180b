//! Orchestrator - plan lifecycle over the live stop set
//!
//! Owns the state machine NoPlan -> Pending -> Accepted -> Stale and the
//! staleness contract: every asynchronous step captures the stop-store
//! version when it starts and drops its result if the version moved in
//! the meantime. Invalidation is conservative - a stop-set change
//! discards the accepted plan entirely instead of patching it, because
//! its order and estimates may no longer correspond to the current stops.

use std::sync::Arc;

use tracing::{debug, info, warn};
use tripstore::{Stop, StopStore};

use crate::config::DurationPolicy;
use crate::error::PlanError;
use crate::plan::{AcceptedPlan, PlanSuggester, normalize};
use crate::timeline::{self, Timeline};
use crate::travel::TravelLegResolver;

/// Plan lifecycle phase
#[derive(Debug, Clone, PartialEq)]
pub enum PlanPhase {
    /// No plan exists
    NoPlan,
    /// A generation request is in flight
    Pending,
    /// A normalized plan is active for the captured stop-set version
    Accepted(AcceptedPlan),
    /// The stop set changed under an accepted plan; the plan is gone
    Stale,
}

/// Coordinates suggestion, normalization, and travel resolution over the
/// live stop set.
pub struct Orchestrator {
    store: StopStore,
    suggester: Arc<dyn PlanSuggester>,
    resolver: Arc<TravelLegResolver>,
    policy: DurationPolicy,
    phase: PlanPhase,
    /// Store version the accepted plan corresponds to
    accepted_version: u64,
}

impl Orchestrator {
    /// Create an orchestrator over its collaborators
    pub fn new(
        store: StopStore,
        suggester: Arc<dyn PlanSuggester>,
        resolver: Arc<TravelLegResolver>,
        policy: DurationPolicy,
    ) -> Self {
        Self {
            store,
            suggester,
            resolver,
            policy,
            phase: PlanPhase::NoPlan,
            accepted_version: 0,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> &PlanPhase {
        &self.phase
    }

    /// The accepted plan, if one is active
    pub fn plan(&self) -> Option<&AcceptedPlan> {
        match &self.phase {
            PlanPhase::Accepted(plan) => Some(plan),
            _ => None,
        }
    }

    /// Live stops in order
    pub fn stops(&self) -> &[Stop] {
        self.store.stops()
    }

    /// Add a stop; an existing plan goes stale
    pub fn add_stop(&mut self, stop: Stop) -> bool {
        let changed = self.store.add(stop);
        if changed {
            self.invalidate_plan();
        }
        changed
    }

    /// Remove a stop; an existing plan goes stale
    pub fn remove_stop(&mut self, id: &str) -> bool {
        let changed = self.store.remove(id);
        if changed {
            self.invalidate_plan();
        }
        changed
    }

    /// Remove all stops; an existing plan goes stale
    pub fn clear_stops(&mut self) -> bool {
        let changed = self.store.clear();
        if changed {
            self.invalidate_plan();
        }
        changed
    }

    /// Generate a plan for the current stops.
    ///
    /// Returns `Ok(None)` when the stop set changed while the suggestion
    /// was in flight - the response is dropped, no partial state is
    /// committed. On any error the phase falls back to NoPlan and the
    /// prior plan (already discarded on entry to Pending) is not
    /// resurrected.
    pub async fn generate(&mut self) -> Result<Option<&AcceptedPlan>, PlanError> {
        let have = self.store.len();
        if have < 2 {
            // Rejected before any call; the phase does not move
            return Err(PlanError::NotEnoughStops { have });
        }

        let captured = self.store.version();
        info!(version = captured, stop_count = have, "generate: requesting suggestion");
        self.phase = PlanPhase::Pending;

        let raw = match self.suggester.suggest(self.store.stops()).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "generate: suggestion failed");
                self.phase = PlanPhase::NoPlan;
                return Err(e);
            }
        };

        if self.store.version() != captured {
            warn!(
                captured,
                current = self.store.version(),
                "generate: stop set changed mid-flight, dropping suggestion"
            );
            self.phase = PlanPhase::NoPlan;
            return Ok(None);
        }

        let plan = normalize(&raw, self.store.stops());
        info!(order_len = plan.order.len(), "generate: plan accepted");
        self.accept(plan).await;
        Ok(self.plan())
    }

    /// Apply the accepted plan's order to the stop store.
    ///
    /// Re-enters Accepted with the plan re-derived against the reordered
    /// set - the order itself must come through unchanged - and
    /// re-triggers travel resolution.
    pub async fn apply_order(&mut self) -> bool {
        let PlanPhase::Accepted(plan) = &self.phase else {
            debug!("apply_order: no accepted plan");
            return false;
        };

        let raw = plan.as_suggested();
        self.store.reorder(&raw.order);
        let plan = normalize(&raw, self.store.stops());
        debug_assert_eq!(plan.order, raw.order, "applying an order must not reorder it");

        info!(order_len = plan.order.len(), "apply_order: order applied to store");
        self.accept(plan).await;
        true
    }

    /// Discard any plan explicitly
    pub async fn clear_plan(&mut self) {
        debug!("clear_plan: called");
        self.phase = PlanPhase::NoPlan;
        self.resolver.reset().await;
    }

    /// Re-resolve travel legs for the accepted plan, for callers that
    /// want to retry after a degraded resolution
    pub async fn refresh_travel(&self) -> bool {
        let Some(plan) = self.plan() else {
            return false;
        };
        let ordered = self.ordered_stops(plan);
        self.resolver.resolve(&ordered).await.is_some()
    }

    /// Build the timeline for the accepted plan with whatever travel
    /// data is currently known
    pub async fn timeline(&self) -> Option<Timeline> {
        let plan = self.plan()?;
        let legs = self.resolver.current().await;
        Some(timeline::build(plan, self.store.stops(), legs.as_ref(), &self.policy))
    }

    /// Enter Accepted and trigger leg resolution for the plan's order
    async fn accept(&mut self, plan: AcceptedPlan) {
        let ordered = self.ordered_stops(&plan);
        self.accepted_version = self.store.version();
        self.phase = PlanPhase::Accepted(plan);
        // Last-requested-wins inside the resolver keeps this safe even
        // if an older resolution is still in flight
        self.resolver.resolve(&ordered).await;
    }

    /// Stops in plan order (every plan id is live, by normalization)
    fn ordered_stops(&self, plan: &AcceptedPlan) -> Vec<Stop> {
        plan.order
            .iter()
            .filter_map(|id| self.store.stops().iter().find(|s| &s.id == id))
            .cloned()
            .collect()
    }

    /// Conservative invalidation on stop-set change
    fn invalidate_plan(&mut self) {
        if matches!(self.phase, PlanPhase::Accepted(_)) {
            info!(
                accepted_version = self.accepted_version,
                current_version = self.store.version(),
                "invalidate_plan: stop set changed, plan discarded"
            );
            self.phase = PlanPhase::Stale;
        }
    }
}
