//! Mobility and exploration metrics.

use crate::cluster::LocationCluster;
use crate::point::EntryPoint;

/// Total great-circle distance along consecutive points, in kilometers.
///
/// The caller must pass points sorted ascending by `recorded_at`; fewer than
/// two points yields 0.
pub fn total_distance_km(points: &[EntryPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].coordinates.distance_km(&pair[1].coordinates))
        .sum()
}

/// Mobility score 0-100: up to 50 points from location-count diversity, up to
/// 50 from distance traveled.
pub fn mobility_score(unique_location_count: usize, total_distance_km: f64) -> u8 {
    let location_score = f64::min(unique_location_count as f64 * 10.0, 50.0);
    let distance_score = f64::min(total_distance_km * 2.0, 50.0);

    f64::min((location_score + distance_score).round(), 100.0) as u8
}

/// Exploration score 0-100: how distributed entries were across clusters.
///
/// `clusters` must be sorted descending by entry count (the first cluster is
/// the primary one). Diversity rewards entries spread away from the primary
/// cluster; a bonus of 5 per cluster (capped at 30) rewards having many
/// distinct places at all.
pub fn exploration_score(clusters: &[LocationCluster], total_entries: usize) -> u8 {
    if clusters.is_empty() || total_entries == 0 {
        return 0;
    }

    let primary_ratio = clusters[0].entry_count as f64 / total_entries as f64;
    let diversity = (1.0 - primary_ratio) * 100.0;
    let bonus = f64::min(clusters.len() as f64 * 5.0, 30.0);

    f64::min((diversity + bonus).round(), 100.0) as u8
}

/// Share of located entries recorded at the primary cluster, 0-100.
pub fn time_at_home_percent(primary_cluster_entries: usize, total_located_entries: usize) -> u8 {
    if total_located_entries == 0 {
        return 0;
    }
    ((primary_cluster_entries as f64 / total_located_entries as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coordinates;
    use chrono::Utc;

    fn point(lat: f64, lon: f64) -> EntryPoint {
        EntryPoint::new("p", Coordinates::new(lat, lon).unwrap(), Utc::now())
    }

    fn cluster_of(entry_count: usize) -> LocationCluster {
        LocationCluster {
            center_lat: 0.0,
            center_lng: 0.0,
            radius_meters: 0.0,
            entry_count,
            label: String::new(),
        }
    }

    #[test]
    fn test_total_distance_fewer_than_two_points() {
        assert_eq!(total_distance_km(&[]), 0.0);
        assert_eq!(total_distance_km(&[point(40.0, -74.0)]), 0.0);
    }

    #[test]
    fn test_total_distance_sums_consecutive_legs() {
        let nyc = point(40.7128, -74.0060);
        let la = point(34.0522, -118.2437);
        let there_and_back = vec![nyc.clone(), la, nyc];
        let d = total_distance_km(&there_and_back);
        assert!(d > 2.0 * 3936.0 && d < 2.0 * 3944.0, "got {}", d);
    }

    #[test]
    fn test_mobility_score_bounds() {
        assert_eq!(mobility_score(0, 0.0), 0);
        assert_eq!(mobility_score(100, 10_000.0), 100);
        for count in [0, 1, 3, 10, 50] {
            for dist in [0.0, 1.0, 25.0, 500.0] {
                let s = mobility_score(count, dist);
                assert!(s <= 100);
            }
        }
    }

    #[test]
    fn test_mobility_score_monotone_in_each_factor() {
        assert!(mobility_score(1, 0.0) < mobility_score(10, 0.0));
        assert!(mobility_score(1, 10.0) < mobility_score(1, 100.0));
    }

    #[test]
    fn test_mobility_score_caps_each_factor_at_fifty() {
        // 5 locations saturate the location half; more adds nothing.
        assert_eq!(mobility_score(5, 0.0), 50);
        assert_eq!(mobility_score(50, 0.0), 50);
        // 25km saturates the distance half.
        assert_eq!(mobility_score(0, 25.0), 50);
        assert_eq!(mobility_score(0, 1000.0), 50);
    }

    #[test]
    fn test_exploration_score_empty() {
        assert_eq!(exploration_score(&[], 10), 0);
        assert_eq!(exploration_score(&[cluster_of(3)], 0), 0);
    }

    #[test]
    fn test_exploration_rewards_distribution() {
        let even = vec![cluster_of(5), cluster_of(5)];
        let skewed = vec![cluster_of(9), cluster_of(1)];
        assert!(exploration_score(&even, 10) > exploration_score(&skewed, 10));
    }

    #[test]
    fn test_exploration_single_cluster() {
        // All entries at one place: diversity 0, bonus 5.
        assert_eq!(exploration_score(&[cluster_of(7)], 7), 5);
    }

    #[test]
    fn test_time_at_home() {
        assert_eq!(time_at_home_percent(0, 0), 0);
        assert_eq!(time_at_home_percent(3, 4), 75);
        assert_eq!(time_at_home_percent(4, 4), 100);
        assert_eq!(time_at_home_percent(1, 3), 33);
    }
}
