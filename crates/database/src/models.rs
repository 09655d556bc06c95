//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use journal_core::TranscriptEntry;
use location_insights::LocationInsights;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// A journal owner and their reflection schedule preference.
///
/// The scheduler is the sole writer of `next_reflection_at`; it is always the
/// next future instant whose local weekday/time match the preference in the
/// user's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// UUID.
    pub id: String,
    pub email: String,
    pub name: String,
    /// IANA zone name (e.g. "America/New_York").
    pub timezone: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub reflection_weekday: i64,
    /// Local time of day, "HH:MM" 24h.
    pub reflection_time: String,
    /// Next reflection instant, absolute.
    pub next_reflection_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with the default schedule (Sunday 18:00, New York).
    pub fn new(email: impl Into<String>, name: impl Into<String>, next_reflection_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            timezone: "America/New_York".to_string(),
            reflection_weekday: 0,
            reflection_time: "18:00".to_string(),
            next_reflection_at,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a week.
///
/// `recording -> processing -> {complete | error}`; complete and error are
/// terminal. A new week is created for the next period rather than reusing a
/// terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Recording,
    Processing,
    Complete,
    Error,
}

impl WeekStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStatus::Recording => "recording",
            WeekStatus::Processing => "processing",
            WeekStatus::Complete => "complete",
            WeekStatus::Error => "error",
        }
    }
}

impl fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recording" => Ok(WeekStatus::Recording),
            "processing" => Ok(WeekStatus::Processing),
            "complete" => Ok(WeekStatus::Complete),
            "error" => Ok(WeekStatus::Error),
            other => Err(format!("unknown week status: {}", other)),
        }
    }
}

/// The AI-generated portion of a processed week, minus the narrative summary
/// (stored in its own column).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekInsights {
    pub mood_trend: String,
    pub key_themes: Vec<String>,
    pub highlights: Vec<String>,
    /// Movement-vs-mood observation from the summarizer, if any.
    pub location_note: Option<String>,
    /// Derived location analytics, absent when no entry carried coordinates.
    pub location: Option<LocationInsights>,
}

/// A 7-day recording period ending at the user's reflection instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    /// UUID.
    pub id: String,
    pub user_id: String,
    /// ISO week number of the reflection date, in the user's zone.
    pub week_number: i64,
    /// ISO week-year of the reflection date, in the user's zone.
    pub year: i64,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub reflection_date: DateTime<Utc>,
    pub status: WeekStatus,
    /// One record per entry, recording-time order. Empty until processed.
    pub transcriptions: Vec<TranscriptEntry>,
    /// Narrative summary from the summarizer.
    pub summary: Option<String>,
    pub insights: Option<WeekInsights>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Week {
    /// Create a fresh recording week.
    pub fn new(
        user_id: impl Into<String>,
        year: i64,
        week_number: i64,
        week_start: DateTime<Utc>,
        week_end: DateTime<Utc>,
        reflection_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            week_number,
            year,
            week_start,
            week_end,
            reflection_date,
            status: WeekStatus::Recording,
            transcriptions: Vec::new(),
            summary: None,
            insights: None,
            processed_at: None,
            created_at: Utc::now(),
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Week {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status_text: String = row.try_get("status")?;
        let status = WeekStatus::from_str(&status_text).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })?;

        let transcriptions_json: String = row.try_get("transcriptions")?;
        let transcriptions = serde_json::from_str(&transcriptions_json).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "transcriptions".to_string(),
                source: Box::new(e),
            }
        })?;

        let insights_json: Option<String> = row.try_get("insights")?;
        let insights = insights_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "insights".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            week_number: row.try_get("week_number")?,
            year: row.try_get("year")?,
            week_start: row.try_get("week_start")?,
            week_end: row.try_get("week_end")?,
            reflection_date: row.try_get("reflection_date")?,
            status,
            transcriptions,
            summary: row.try_get("summary")?,
            insights,
            processed_at: row.try_get("processed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// GPS fix captured alongside an entry.
///
/// Coordinates are validated at the ingestion boundary; address fields are
/// filled in asynchronously by reverse-geocoding enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

impl EntryLocation {
    /// A bare fix with no enrichment.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp,
            address: None,
            city: None,
            state: None,
            country: None,
            neighborhood: None,
            formatted_address: None,
        }
    }
}

/// One recorded diary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// UUID.
    pub id: String,
    pub user_id: String,
    pub week_id: String,
    /// Path or URL of the stored audio.
    pub audio_ref: String,
    pub duration_secs: f64,
    pub recorded_at: DateTime<Utc>,
    pub location: Option<EntryLocation>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        user_id: impl Into<String>,
        week_id: impl Into<String>,
        audio_ref: impl Into<String>,
        duration_secs: f64,
        recorded_at: DateTime<Utc>,
        location: Option<EntryLocation>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            week_id: week_id.into(),
            audio_ref: audio_ref.into(),
            duration_secs,
            recorded_at,
            location,
            created_at: Utc::now(),
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Entry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let location_json: Option<String> = row.try_get("location")?;
        let location = location_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "location".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            week_id: row.try_get("week_id")?,
            audio_ref: row.try_get("audio_ref")?,
            duration_secs: row.try_get("duration_secs")?,
            recorded_at: row.try_get("recorded_at")?,
            location,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_status_round_trip() {
        for status in [
            WeekStatus::Recording,
            WeekStatus::Processing,
            WeekStatus::Complete,
            WeekStatus::Error,
        ] {
            assert_eq!(WeekStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(WeekStatus::from_str("done").is_err());
    }

    #[test]
    fn test_new_week_starts_recording() {
        let now = Utc::now();
        let week = Week::new("u1", 2025, 23, now, now, now);
        assert_eq!(week.status, WeekStatus::Recording);
        assert!(week.transcriptions.is_empty());
        assert!(week.insights.is_none());
        assert!(week.processed_at.is_none());
    }

    #[test]
    fn test_entry_location_serde_defaults() {
        // Enrichment fields may be absent in stored payloads.
        let json = r#"{"latitude":40.7,"longitude":-74.0,"accuracy":null,"timestamp":"2025-06-02T09:00:00Z"}"#;
        let loc: EntryLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.latitude, 40.7);
        assert!(loc.address.is_none());
    }
}
