//! Great-circle distance

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert!(haversine_km(6.9271, 79.8612, 6.9271, 79.8612).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let d = haversine_km(6.0, 80.0, 7.0, 80.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_colombo_to_kandy() {
        let d = haversine_km(6.9271, 79.8612, 7.2906, 80.6337);
        assert!((94.0..95.5).contains(&d), "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let ab = haversine_km(6.03, 80.22, 7.96, 80.76);
        let ba = haversine_km(7.96, 80.76, 6.03, 80.22);
        assert!((ab - ba).abs() < 1e-9);
    }
}
