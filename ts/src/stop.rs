//! Stop type - a single geographic stop on the trip

use serde::{Deserialize, Serialize};

/// A geographic stop supplied by an external source (search, nearby
/// discovery). Identity is the `id`; the core never invents stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Unique, stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Stop {
    /// Create a new stop
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_serde_round_trip() {
        let stop = Stop::new("node-42", "Galle Fort", 6.0261, 80.2168);
        let json = serde_json::to_string(&stop).unwrap();
        let back: Stop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stop);
    }
}
