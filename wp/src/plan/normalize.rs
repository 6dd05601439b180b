//! Plan normalization - repair a raw suggestion against the live stop set

use std::collections::{HashMap, HashSet};

use tracing::debug;
use tripstore::Stop;

use super::{AcceptedPlan, SuggestedPlan};

/// Normalize a raw suggested plan against the live stop set.
///
/// Never errors: the result always holds the accepted-plan invariants as
/// long as `live` is non-empty. Foreign ids are dropped (order and
/// estimates alike), duplicates are dropped keeping the first occurrence,
/// and an order that filters down to nothing falls back to the live set's
/// own sequence. Estimate values are preserved exactly as given - no
/// clamping.
pub fn normalize(raw: &SuggestedPlan, live: &[Stop]) -> AcceptedPlan {
    debug_assert!(!live.is_empty(), "normalize requires a non-empty stop set");

    let valid_ids: HashSet<&str> = live.iter().map(|s| s.id.as_str()).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<String> = raw
        .order
        .iter()
        .filter(|id| valid_ids.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    if order.is_empty() {
        debug!(
            raw_len = raw.order.len(),
            "normalize: order empty after filtering, using live sequence"
        );
        order = live.iter().map(|s| s.id.clone()).collect();
    }

    let time_estimates: HashMap<String, i64> = raw
        .time_estimates
        .iter()
        .filter(|e| valid_ids.contains(e.id.as_str()))
        .map(|e| (e.id.clone(), e.minutes))
        .collect();

    AcceptedPlan {
        order,
        stay_area: raw.stay_area.clone(),
        meal_suggestions: raw.meal_suggestions.clone(),
        time_estimates,
    }
}
