//! Per-week insight aggregation.

use crate::cluster::cluster;
use crate::metrics::{exploration_score, mobility_score, time_at_home_percent, total_distance_km};
use crate::point::EntryPoint;
use crate::{LocationInsights, PrimaryLocation};

/// Clustering radius used for weekly analysis: entries within 100 meters of a
/// seed count as the same place.
pub const CLUSTER_RADIUS_METERS: f64 = 100.0;

/// Analyze a week's located entries into a [`LocationInsights`] record.
///
/// `points` are the entries that carry valid coordinates, in recording order.
/// Returns `None` when the slice is empty — the week has no location story
/// and callers omit the section entirely.
///
/// Outputs are rounded to stable precision (distance to 2 decimals, scores to
/// integers) so repeated runs over the same input compare equal.
pub fn analyze_week(points: &[EntryPoint]) -> Option<LocationInsights> {
    if points.is_empty() {
        return None;
    }

    let clusters = cluster(points, CLUSTER_RADIUS_METERS);

    let mut by_time: Vec<EntryPoint> = points.to_vec();
    by_time.sort_by_key(|p| p.recorded_at);
    let distance = total_distance_km(&by_time);

    let mobility = mobility_score(clusters.len(), distance);
    let exploration = exploration_score(&clusters, points.len());

    let primary = clusters.first();
    let time_at_home = primary
        .map(|c| time_at_home_percent(c.entry_count, points.len()))
        .unwrap_or(0);
    let primary_location = primary.map(|c| PrimaryLocation {
        latitude: c.center_lat,
        longitude: c.center_lng,
        address: None,
        entry_count: c.entry_count,
    });

    Some(LocationInsights {
        total_unique_locations: clusters.len(),
        primary_location,
        mobility_score: mobility,
        distance_traveled_km: (distance * 100.0).round() / 100.0,
        location_clusters: clusters,
        time_at_home_percent: time_at_home,
        exploration_score: exploration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coordinates;
    use chrono::{TimeZone, Utc};

    fn point_at(id: &str, lat: f64, lon: f64, hour: u32) -> EntryPoint {
        EntryPoint::new(
            id,
            Coordinates::new(lat, lon).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_no_points_yields_none() {
        assert!(analyze_week(&[]).is_none());
    }

    #[test]
    fn test_single_point_week() {
        let insights = analyze_week(&[point_at("a", 40.7128, -74.0060, 9)]).unwrap();

        assert_eq!(insights.total_unique_locations, 1);
        assert_eq!(insights.distance_traveled_km, 0.0);
        assert_eq!(insights.time_at_home_percent, 100);
        let primary = insights.primary_location.unwrap();
        assert_eq!(primary.entry_count, 1);
        assert!(primary.address.is_none());
    }

    #[test]
    fn test_distance_uses_time_order_not_input_order() {
        // Input order hops NYC -> LA -> NYC, but recording times put the two
        // NYC entries adjacent: one one-way trip, not two.
        let points = vec![
            point_at("n1", 40.7128, -74.0060, 9),
            point_at("la", 34.0522, -118.2437, 20),
            point_at("n2", 40.7128, -74.0060, 11),
        ];
        let insights = analyze_week(&points).unwrap();
        assert!(
            insights.distance_traveled_km > 3936.0 && insights.distance_traveled_km < 3944.0,
            "got {}",
            insights.distance_traveled_km
        );
    }

    #[test]
    fn test_distance_rounded_to_two_decimals() {
        let points = vec![
            point_at("a", 40.0, -74.0, 9),
            point_at("b", 40.01, -74.01, 10),
        ];
        let insights = analyze_week(&points).unwrap();
        let scaled = insights.distance_traveled_km * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn test_two_place_week() {
        let points = vec![
            point_at("h1", 40.7128, -74.0060, 8),
            point_at("h2", 40.71281, -74.00601, 12),
            point_at("h3", 40.71279, -74.00599, 22),
            point_at("w1", 40.7580, -73.9855, 10),
        ];
        let insights = analyze_week(&points).unwrap();

        assert_eq!(insights.total_unique_locations, 2);
        assert_eq!(insights.time_at_home_percent, 75);
        assert_eq!(insights.location_clusters[0].label, "Home");
        assert!(insights.mobility_score > 0 && insights.mobility_score <= 100);
        assert!(insights.exploration_score > 0 && insights.exploration_score <= 100);
    }
}
