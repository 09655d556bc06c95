//! Validation for schedule-preference fields.
//!
//! Schedule inputs are rejected here, at the settings boundary, before they
//! can corrupt a stored `next_reflection_at`.

use chrono_tz::Tz;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Weekday outside 0 (Sunday) ..= 6 (Saturday).
    #[error("invalid reflection weekday: {0} (must be 0-6)")]
    Weekday(i64),

    /// Time not in 24h "HH:MM" form.
    #[error("invalid reflection time: {0:?} (must be HH:MM)")]
    Time(String),

    /// Unrecognized IANA timezone name.
    #[error("invalid timezone: {0:?}")]
    Timezone(String),

    /// Latitude outside [-90, 90].
    #[error("invalid latitude: {0}")]
    Latitude(f64),

    /// Longitude outside [-180, 180].
    #[error("invalid longitude: {0}")]
    Longitude(f64),
}

/// Validate a reflection weekday (0 = Sunday .. 6 = Saturday).
pub fn validate_weekday(weekday: i64) -> Result<(), ValidationError> {
    if (0..=6).contains(&weekday) {
        Ok(())
    } else {
        Err(ValidationError::Weekday(weekday))
    }
}

/// Parse a 24h "HH:MM" reflection time into (hour, minute).
pub fn parse_reflection_time(time: &str) -> Result<(u32, u32), ValidationError> {
    let invalid = || ValidationError::Time(time.to_string());

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hours.parse().map_err(|_| invalid())?;
    let minute: u32 = minutes.parse().map_err(|_| invalid())?;

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    Ok((hour, minute))
}

/// Validate a 24h "HH:MM" reflection time.
pub fn validate_reflection_time(time: &str) -> Result<(), ValidationError> {
    parse_reflection_time(time).map(|_| ())
}

/// Parse an IANA timezone name.
pub fn parse_timezone(timezone: &str) -> Result<Tz, ValidationError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ValidationError::Timezone(timezone.to_string()))
}

/// Validate a latitude/longitude pair.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
        return Err(ValidationError::Latitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
        return Err(ValidationError::Longitude(longitude));
    }
    Ok(())
}
