//! Geospatial analytics for a week of GPS-tagged diary entries.
//!
//! Everything in this crate is pure and synchronous: given the located
//! entries of one week, it derives spatial clusters ("places"), distance
//! traveled, and 0-100 mobility/exploration/time-at-home scores. The output
//! is a [`LocationInsights`] record the reflection pipeline embeds in the
//! persisted week.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use location_insights::{analyze_week, Coordinates, EntryPoint};
//!
//! let home = Coordinates::new(40.7128, -74.0060).unwrap();
//! let points = vec![EntryPoint::new("entry-1", home, Utc::now())];
//!
//! let insights = analyze_week(&points).unwrap();
//! assert_eq!(insights.total_unique_locations, 1);
//! assert_eq!(insights.time_at_home_percent, 100);
//! ```

mod analyze;
mod cluster;
mod distance;
mod metrics;
mod point;

pub use analyze::{analyze_week, CLUSTER_RADIUS_METERS};
pub use cluster::{cluster, LocationCluster};
pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use metrics::{exploration_score, mobility_score, time_at_home_percent, total_distance_km};
pub use point::{Coordinates, CoordinateError, EntryPoint};

use serde::{Deserialize, Serialize};

/// The center of a user's most-visited cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Populated by external reverse-geocoding enrichment, never here.
    pub address: Option<String>,
    /// How many entries were recorded there.
    pub entry_count: usize,
}

/// Derived location insight for one week.
///
/// Recomputed from scratch on every processing run; never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInsights {
    /// Number of distinct clusters the week's entries fell into.
    pub total_unique_locations: usize,
    /// Center of the largest cluster.
    pub primary_location: Option<PrimaryLocation>,
    /// 0-100: how much the user moved (count diversity + distance).
    pub mobility_score: u8,
    /// Total distance along the time-ordered entry trail, km, 2 decimals.
    pub distance_traveled_km: f64,
    /// All clusters, sorted descending by entry count.
    pub location_clusters: Vec<LocationCluster>,
    /// 0-100: share of entries recorded at the primary cluster.
    pub time_at_home_percent: u8,
    /// 0-100: how distributed (vs. concentrated) the entries were.
    pub exploration_score: u8,
}
