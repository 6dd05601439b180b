//! Travel legs - buffered per-leg travel figures
//!
//! "Unknown" travel data is an `Option::None`, never a zero: the builder
//! and orchestrator must be able to tell "still loading / failed" apart
//! from "zero minutes of travel".

mod resolver;

pub use resolver::TravelLegResolver;

use crate::clients::RouteLegs;
use crate::config::DurationPolicy;

/// Buffered travel figures aligned 1:1 with consecutive pairs in the
/// stop order (length = |order| - 1).
#[derive(Debug, Clone, PartialEq)]
pub struct TravelLegs {
    /// Buffered minutes per leg, at least 1 each
    pub leg_minutes: Vec<i64>,
    /// Kilometers per leg, one decimal, at least 0.1 each
    pub leg_distances_km: Vec<f64>,
    /// Sum of the buffered per-leg minutes
    pub total_minutes: i64,
}

impl TravelLegs {
    /// Convert raw routing figures into buffered legs.
    ///
    /// Minutes: `round(seconds * buffer / 60)` floored at 1. Distances:
    /// meters to kilometers rounded to one decimal, floored at 0.1. The
    /// total is the sum of the buffered per-leg minutes, not a separate
    /// figure from the routing engine.
    pub fn from_raw(raw: &RouteLegs, policy: &DurationPolicy) -> Self {
        let leg_minutes: Vec<i64> = raw
            .durations_seconds
            .iter()
            .map(|&seconds| ((seconds * policy.travel_buffer / 60.0).round() as i64).max(1))
            .collect();

        let leg_distances_km: Vec<f64> = raw
            .distances_meters
            .iter()
            .map(|&meters| ((meters / 100.0).round() / 10.0).max(0.1))
            .collect();

        let total_minutes = leg_minutes.iter().sum();

        Self {
            leg_minutes,
            leg_distances_km,
            total_minutes,
        }
    }

    /// Number of legs
    pub fn len(&self) -> usize {
        self.leg_minutes.len()
    }

    /// True when no legs are present
    pub fn is_empty(&self) -> bool {
        self.leg_minutes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_applies_buffer() {
        let raw = RouteLegs {
            durations_seconds: vec![1200.0, 900.0],
            distances_meters: vec![18_000.0, 11_050.0],
        };
        let legs = TravelLegs::from_raw(&raw, &DurationPolicy::default());

        // 1200s * 1.3 / 60 = 26, 900s * 1.3 / 60 = 19.5 -> 20
        assert_eq!(legs.leg_minutes, vec![26, 20]);
        assert_eq!(legs.total_minutes, 46);
        assert_eq!(legs.leg_distances_km, vec![18.0, 11.1]);
    }

    #[test]
    fn test_from_raw_floors_tiny_legs() {
        let raw = RouteLegs {
            durations_seconds: vec![5.0],
            distances_meters: vec![20.0],
        };
        let legs = TravelLegs::from_raw(&raw, &DurationPolicy::default());

        assert_eq!(legs.leg_minutes, vec![1]);
        assert_eq!(legs.leg_distances_km, vec![0.1]);
        assert_eq!(legs.total_minutes, 1);
    }

    #[test]
    fn test_total_is_sum_of_buffered_legs() {
        let raw = RouteLegs {
            durations_seconds: vec![60.0, 60.0, 60.0],
            distances_meters: vec![1000.0, 1000.0, 1000.0],
        };
        let legs = TravelLegs::from_raw(&raw, &DurationPolicy::default());

        // Each leg rounds to 1 minute buffered (1.3 min), total is the
        // per-leg sum rather than round(3 * 1.3)
        assert_eq!(legs.leg_minutes, vec![1, 1, 1]);
        assert_eq!(legs.total_minutes, 3);
    }

    #[test]
    fn test_custom_buffer() {
        let policy = DurationPolicy {
            travel_buffer: 2.0,
            ..DurationPolicy::default()
        };
        let raw = RouteLegs {
            durations_seconds: vec![600.0],
            distances_meters: vec![5000.0],
        };
        let legs = TravelLegs::from_raw(&raw, &policy);
        assert_eq!(legs.leg_minutes, vec![20]);
    }
}
