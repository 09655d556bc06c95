//! Haversine great-circle distance.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers.
///
/// Inputs are assumed to be valid latitudes/longitudes; validation happens at
/// entry creation. Identical points yield exactly 0 and the function is
/// symmetric in its arguments.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_zero() {
        assert_eq!(distance_km(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let ab = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
        let ba = distance_km(34.0522, -118.2437, 40.7128, -74.0060);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_new_york_to_los_angeles() {
        let d = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
        assert!(d > 3936.0 && d < 3944.0, "got {}", d);
    }

    #[test]
    fn test_short_distance() {
        // Two points ~111m apart (0.001 degrees of latitude).
        let d = distance_km(40.0, -74.0, 40.001, -74.0);
        assert!(d > 0.10 && d < 0.12, "got {}", d);
    }
}
