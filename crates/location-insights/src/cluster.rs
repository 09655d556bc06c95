//! Distance-based location clustering.

use serde::{Deserialize, Serialize};

use crate::point::EntryPoint;

/// A group of geographically nearby entries treated as one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCluster {
    /// Mean latitude of the member entries.
    pub center_lat: f64,
    /// Mean longitude of the member entries.
    pub center_lng: f64,
    /// Max member distance from the mean center, in meters.
    pub radius_meters: f64,
    /// Number of member entries.
    pub entry_count: usize,
    /// "Home", "Work", or "Location N".
    pub label: String,
}

/// Group entry points into clusters by distance to a seed point.
///
/// Iterates points in input order; each unassigned point seeds a new cluster
/// and greedily absorbs every later unassigned point within `radius_meters`
/// of the seed (not of the evolving centroid). The grouping is therefore
/// order-sensitive: the first-seen point in scan order anchors its cluster.
///
/// Returned clusters are sorted descending by entry count, ties keeping
/// discovery order. Single-member clusters are labeled by discovery position
/// (`"Location {index + 1}"`); multi-member clusters by sorted rank ("Home",
/// "Work", then `"Location {rank + 1}"`).
pub fn cluster(points: &[EntryPoint], radius_meters: f64) -> Vec<LocationCluster> {
    let radius_km = radius_meters / 1000.0;
    let mut assigned = vec![false; points.len()];
    // (discovery index, member indices)
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();

    for i in 0..points.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![i];

        let seed = &points[i].coordinates;
        for j in (i + 1)..points.len() {
            if assigned[j] {
                continue;
            }
            if seed.distance_km(&points[j].coordinates) <= radius_km {
                assigned[j] = true;
                members.push(j);
            }
        }

        groups.push((groups.len(), members));
    }

    let mut clusters: Vec<(usize, LocationCluster)> = groups
        .into_iter()
        .map(|(discovery_index, members)| {
            let count = members.len() as f64;
            let center_lat = members
                .iter()
                .map(|&m| points[m].coordinates.latitude())
                .sum::<f64>()
                / count;
            let center_lng = members
                .iter()
                .map(|&m| points[m].coordinates.longitude())
                .sum::<f64>()
                / count;

            let radius_meters = members
                .iter()
                .map(|&m| {
                    crate::distance::distance_km(
                        center_lat,
                        center_lng,
                        points[m].coordinates.latitude(),
                        points[m].coordinates.longitude(),
                    ) * 1000.0
                })
                .fold(0.0, f64::max);

            (
                discovery_index,
                LocationCluster {
                    center_lat,
                    center_lng,
                    radius_meters,
                    entry_count: members.len(),
                    label: String::new(),
                },
            )
        })
        .collect();

    // Stable sort keeps discovery order among equal counts.
    clusters.sort_by(|a, b| b.1.entry_count.cmp(&a.1.entry_count));

    for (rank, (discovery_index, c)) in clusters.iter_mut().enumerate() {
        c.label = if c.entry_count == 1 {
            format!("Location {}", *discovery_index + 1)
        } else {
            match rank {
                0 => "Home".to_string(),
                1 => "Work".to_string(),
                _ => format!("Location {}", rank + 1),
            }
        };
    }

    clusters.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coordinates;
    use chrono::Utc;

    fn point(id: &str, lat: f64, lon: f64) -> EntryPoint {
        EntryPoint::new(id, Coordinates::new(lat, lon).unwrap(), Utc::now())
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster(&[], 100.0).is_empty());
    }

    #[test]
    fn test_single_point() {
        let clusters = cluster(&[point("a", 40.7128, -74.0060)], 100.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].entry_count, 1);
        assert_eq!(clusters[0].label, "Location 1");
        assert_eq!(clusters[0].radius_meters, 0.0);
    }

    #[test]
    fn test_radius_larger_than_spread_yields_one_cluster() {
        // Points across Manhattan, radius 50km.
        let points = vec![
            point("a", 40.7128, -74.0060),
            point("b", 40.7306, -73.9866),
            point("c", 40.7580, -73.9855),
            point("d", 40.8075, -73.9626),
        ];
        let clusters = cluster(&points, 50_000.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].entry_count, 4);
        assert_eq!(clusters[0].label, "Home");
    }

    #[test]
    fn test_sorted_descending_by_count_with_rank_labels() {
        // Three entries near home, two near work, one off on its own.
        let points = vec![
            point("lone", 34.0522, -118.2437),
            point("h1", 40.7128, -74.0060),
            point("h2", 40.71281, -74.00601),
            point("h3", 40.71279, -74.00599),
            point("w1", 40.7580, -73.9855),
            point("w2", 40.75801, -73.98551),
        ];
        let clusters = cluster(&points, 100.0);

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].entry_count, 3);
        assert_eq!(clusters[0].label, "Home");
        assert_eq!(clusters[1].entry_count, 2);
        assert_eq!(clusters[1].label, "Work");
        // The lone point was discovered first, so it keeps "Location 1".
        assert_eq!(clusters[2].entry_count, 1);
        assert_eq!(clusters[2].label, "Location 1");
    }

    #[test]
    fn test_seed_anchored_not_centroid() {
        // b is within 100m of seed a; c is within 100m of b but not of a.
        // Seed-anchored grouping keeps c out of a's cluster.
        let points = vec![
            point("a", 40.0, -74.0),
            point("b", 40.0008, -74.0), // ~89m from a
            point("c", 40.0016, -74.0), // ~178m from a, ~89m from b
        ];
        let clusters = cluster(&points, 100.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].entry_count, 2);
        assert_eq!(clusters[1].entry_count, 1);
    }

    #[test]
    fn test_center_is_mean_and_radius_covers_members() {
        let points = vec![point("a", 40.0, -74.0), point("b", 40.0008, -74.0)];
        let clusters = cluster(&points, 100.0);
        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert!((c.center_lat - 40.0004).abs() < 1e-9);
        assert!((c.center_lng + 74.0).abs() < 1e-9);
        // Each member sits ~44.5m from the midpoint.
        assert!(c.radius_meters > 40.0 && c.radius_meters < 50.0);
    }

    #[test]
    fn test_tie_preserves_discovery_order() {
        let points = vec![
            point("a1", 40.0, -74.0),
            point("a2", 40.00001, -74.0),
            point("b1", 41.0, -75.0),
            point("b2", 41.00001, -75.0),
        ];
        let clusters = cluster(&points, 100.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].label, "Home");
        assert!((clusters[0].center_lat - 40.000005).abs() < 1e-6);
        assert_eq!(clusters[1].label, "Work");
    }
}
