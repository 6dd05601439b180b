//! Timeline types - timed steps, aggregate totals, start recommendation

mod builder;

pub use builder::build;

/// Which meal a meal step represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

/// One entry in the assembled day timeline.
///
/// `start_label` is the wall-clock time the step begins, 12-hour with
/// AM/PM, derived from the running offset during assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineStep {
    Travel {
        from: String,
        to: String,
        minutes: i64,
        start_label: String,
        /// Known only once real leg data resolved
        distance_km: Option<f64>,
    },
    Visit {
        stop_id: String,
        name: String,
        minutes: i64,
        start_label: String,
    },
    Meal {
        meal: Meal,
        /// Free-text suggestion from the plan, possibly empty
        suggestion: String,
        minutes: i64,
        start_label: String,
    },
}

impl TimelineStep {
    /// Duration of this step in minutes
    pub fn minutes(&self) -> i64 {
        match self {
            TimelineStep::Travel { minutes, .. }
            | TimelineStep::Visit { minutes, .. }
            | TimelineStep::Meal { minutes, .. } => *minutes,
        }
    }

    /// Wall-clock label at which this step begins
    pub fn start_label(&self) -> &str {
        match self {
            TimelineStep::Travel { start_label, .. }
            | TimelineStep::Visit { start_label, .. }
            | TimelineStep::Meal { start_label, .. } => start_label,
        }
    }
}

/// Aggregate trip totals.
///
/// `travel_minutes` and `trip_minutes` stay `None` while leg resolution
/// is pending or failed - they are never synthesized from the placeholder
/// travel default.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub visit_minutes: i64,
    pub meal_minutes: i64,
    pub travel_minutes: Option<i64>,
    pub trip_minutes: Option<i64>,
}

/// Recommended start-of-day, meaningful only once the trip total is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRecommendation {
    /// 6:30 AM - the trip exceeds 8 hours
    Early,
    /// 8:00 AM - the trip fits in 8 hours
    Morning,
    /// Travel data not yet resolved
    Pending,
}

impl StartRecommendation {
    /// Wall-clock label, `None` while pending
    pub fn label(&self) -> Option<&'static str> {
        match self {
            StartRecommendation::Early => Some("6:30 AM"),
            StartRecommendation::Morning => Some("8:00 AM"),
            StartRecommendation::Pending => None,
        }
    }
}

/// A fully assembled day timeline, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub steps: Vec<TimelineStep>,
    pub totals: Totals,
    pub start: StartRecommendation,
}
