//! Great-circle distance.

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance in kilometers between two coordinates in degrees.
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Bounded proximity in (0, 1]: 1 at zero distance, decaying with distance.
pub fn proximity(distance_km: f64) -> f64 {
    1.0 / (1.0 + distance_km.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(great_circle_km(48.85, 2.35, 48.85, 2.35), 0.0);
        assert_eq!(proximity(0.0), 1.0);
    }

    #[test]
    fn test_known_distance() {
        // Paris to London is roughly 344 km
        let d = great_circle_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = great_circle_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_never_zero() {
        let p = proximity(20_000.0);
        assert!(p > 0.0 && p < 0.001);
    }
}
