//! Timeline builder - merges plan, legs, and meal constants into timed steps
//!
//! Pure function over its arguments plus the duration policy: identical
//! inputs always produce the identical timeline. Meal insertion is a fixed
//! policy (breakfast first, lunch after the midpoint visit, dinner last);
//! only the start-time heuristic looks at the clock at all.

use std::collections::HashMap;

use chrono::NaiveTime;
use tracing::debug;
use tripstore::Stop;

use super::{Meal, StartRecommendation, Timeline, TimelineStep, Totals};
use crate::config::DurationPolicy;
use crate::plan::AcceptedPlan;
use crate::travel::TravelLegs;

/// Base offsets in minutes after midnight
const EARLY_START_MINUTES: i64 = 390; // 6:30 AM
const MORNING_START_MINUTES: i64 = 480; // 8:00 AM

/// Trips longer than this get the early start
const LONG_TRIP_MINUTES: i64 = 480;

/// Build the day timeline for an accepted plan.
///
/// `legs` is the resolved travel data or `None` while loading/failed;
/// unresolved legs fall back to the placeholder travel default per leg in
/// the step list, but aggregate travel/trip totals and the start
/// recommendation stay pending. The plan order is never empty here - the
/// normalizer guarantees that upstream.
pub fn build(
    plan: &AcceptedPlan,
    stops: &[Stop],
    legs: Option<&TravelLegs>,
    policy: &DurationPolicy,
) -> Timeline {
    let names: HashMap<&str, &str> = stops.iter().map(|s| (s.id.as_str(), s.name.as_str())).collect();
    let name_of = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

    let n = plan.order.len();
    debug!(stop_count = n, legs_resolved = legs.is_some(), "build: called");

    let totals = compute_totals(plan, legs, policy);

    // Base start-of-day uses a provisional total so the clock is usable
    // even while legs are loading; the placeholder never leaks into the
    // reported totals.
    let provisional_travel = legs
        .map(|l| l.total_minutes)
        .unwrap_or(policy.default_travel_minutes * n.saturating_sub(1) as i64);
    let provisional_total = totals.visit_minutes + totals.meal_minutes + provisional_travel;
    let base = if provisional_total > LONG_TRIP_MINUTES {
        EARLY_START_MINUTES
    } else {
        MORNING_START_MINUTES
    };

    // Lunch lands immediately after the visit at floor(n/2) - 1, never
    // before the first stop is visited
    let lunch_after = (n / 2).saturating_sub(1);

    let meals = &policy.meal_durations;
    let mut steps: Vec<TimelineStep> = Vec::with_capacity(n * 2 + 3);
    let mut clock = base;

    let mut push = |step: TimelineStep, clock: &mut i64| {
        let minutes = step.minutes();
        steps.push(step);
        *clock += minutes;
    };

    push(
        meal_step(Meal::Breakfast, &plan.meal_suggestions.breakfast, meals.breakfast, clock),
        &mut clock,
    );

    for (index, id) in plan.order.iter().enumerate() {
        push(
            TimelineStep::Visit {
                stop_id: id.clone(),
                name: name_of(id),
                minutes: plan.minutes_for(id, policy.default_visit_minutes),
                start_label: clock_label(clock),
            },
            &mut clock,
        );

        if index == lunch_after {
            push(
                meal_step(Meal::Lunch, &plan.meal_suggestions.lunch, meals.lunch, clock),
                &mut clock,
            );
        }

        if index + 1 < n {
            let next = &plan.order[index + 1];
            let minutes = legs
                .and_then(|l| l.leg_minutes.get(index).copied())
                .unwrap_or(policy.default_travel_minutes);
            let distance_km = legs.and_then(|l| l.leg_distances_km.get(index).copied());
            push(
                TimelineStep::Travel {
                    from: name_of(id),
                    to: name_of(next),
                    minutes,
                    start_label: clock_label(clock),
                    distance_km,
                },
                &mut clock,
            );
        }
    }

    push(
        meal_step(Meal::Dinner, &plan.meal_suggestions.dinner, meals.dinner, clock),
        &mut clock,
    );

    let start = match totals.trip_minutes {
        None => StartRecommendation::Pending,
        Some(total) if total > LONG_TRIP_MINUTES => StartRecommendation::Early,
        Some(_) => StartRecommendation::Morning,
    };

    Timeline { steps, totals, start }
}

fn compute_totals(plan: &AcceptedPlan, legs: Option<&TravelLegs>, policy: &DurationPolicy) -> Totals {
    let visit_minutes = plan
        .order
        .iter()
        .map(|id| plan.minutes_for(id, policy.default_visit_minutes))
        .sum();
    let meal_minutes = policy.meal_durations.total();
    let travel_minutes = legs.map(|l| l.total_minutes);
    let trip_minutes = travel_minutes.map(|t| t + visit_minutes + meal_minutes);

    Totals {
        visit_minutes,
        meal_minutes,
        travel_minutes,
        trip_minutes,
    }
}

fn meal_step(meal: Meal, suggestion: &str, minutes: i64, clock: i64) -> TimelineStep {
    TimelineStep::Meal {
        meal,
        suggestion: suggestion.to_string(),
        minutes,
        start_label: clock_label(clock),
    }
}

/// Format minutes-after-midnight as a 12-hour wall-clock label
fn clock_label(minutes_from_midnight: i64) -> String {
    let wrapped = minutes_from_midnight.rem_euclid(24 * 60);
    let time = NaiveTime::from_hms_opt((wrapped / 60) as u32, (wrapped % 60) as u32, 0)
        .unwrap_or(NaiveTime::MIN);
    time.format("%-I:%M %p").to_string()
}
