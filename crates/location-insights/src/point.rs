//! Coordinate and entry-point value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a coordinate pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude outside [-90, 90].
    #[error("latitude out of range: {0} (must be -90..=90)")]
    Latitude(f64),

    /// Longitude outside [-180, 180].
    #[error("longitude out of range: {0} (must be -180..=180)")]
    Longitude(f64),
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair, rejecting out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate, in kilometers.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        crate::distance::distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// One located diary entry, as fed into the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Entry ID, carried through for traceability.
    pub id: String,
    pub coordinates: Coordinates,
    pub recorded_at: DateTime<Utc>,
}

impl EntryPoint {
    pub fn new(id: impl Into<String>, coordinates: Coordinates, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            coordinates,
            recorded_at,
        }
    }
}
