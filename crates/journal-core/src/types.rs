//! Data types carried between reflection pipeline steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transcribed diary entry, in recording-time order.
///
/// Produced once per entry during week processing. A failed transcription is
/// represented by placeholder text rather than an absent record, so the list
/// always lines up one-to-one with the week's entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// ID of the entry this text was transcribed from.
    pub entry_id: String,
    /// Transcribed text, or a `[Transcription failed: ...]` placeholder.
    pub text: String,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Create a transcript record.
    pub fn new(entry_id: impl Into<String>, text: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: entry_id.into(),
            text: text.into(),
            recorded_at,
        }
    }

    /// Create the placeholder record for a failed transcription.
    pub fn failed(entry_id: impl Into<String>, reason: &str, recorded_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: entry_id.into(),
            text: format!("[Transcription failed: {}]", reason),
            recorded_at,
        }
    }

    /// Whether this record holds the failure placeholder instead of real text.
    pub fn is_placeholder(&self) -> bool {
        self.text.starts_with("[Transcription failed:")
    }
}

/// The structured weekly reflection parsed from the summarizer's response.
///
/// Every field degrades to empty/absent when the corresponding labeled
/// section is missing from the response; parsing never fails on partial
/// output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// The 2-3 paragraph narrative summary.
    pub summary: String,
    /// Overall mood trend (e.g. "positive", "mixed", "reflective").
    pub mood_trend: String,
    /// Recurring themes, 3-5 expected.
    pub key_themes: Vec<String>,
    /// Specific moments worth remembering.
    pub highlights: Vec<String>,
    /// Movement-vs-mood observation, present only when location data was
    /// offered to the summarizer.
    pub location_note: Option<String>,
}
