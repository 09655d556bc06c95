//! Mock summarizer implementations.

use std::sync::Mutex;

use chrono_tz::Tz;
use journal_core::{async_trait, SummarizeError, Summarizer, TranscriptEntry, WeeklySummary};
use location_insights::LocationInsights;

/// A call observed by [`StaticSummarizer`].
#[derive(Debug, Clone)]
pub struct SummarizeCall {
    /// Transcripts the summarizer received, in the order given.
    pub transcripts: Vec<TranscriptEntry>,
    /// Whether a location insight accompanied the call.
    pub had_location: bool,
    /// Timezone passed for prompt rendering.
    pub tz: Tz,
}

/// A summarizer that returns the same [`WeeklySummary`] for every week.
///
/// Records each call so tests can assert on what the pipeline handed over.
#[derive(Debug, Default)]
pub struct StaticSummarizer {
    summary: WeeklySummary,
    calls: Mutex<Vec<SummarizeCall>>,
}

impl StaticSummarizer {
    /// Create a summarizer that always returns `summary`.
    pub fn new(summary: WeeklySummary) -> Self {
        Self {
            summary,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a summarizer returning a minimal canned summary.
    pub fn canned(text: impl Into<String>) -> Self {
        Self::new(WeeklySummary {
            summary: text.into(),
            mood_trend: "steady".to_string(),
            key_themes: vec!["routine".to_string()],
            highlights: vec!["a quiet week".to_string()],
            location_note: None,
        })
    }

    /// The calls observed so far.
    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for StaticSummarizer {
    async fn summarize(
        &self,
        transcripts: &[TranscriptEntry],
        location: Option<&LocationInsights>,
        tz: Tz,
    ) -> Result<WeeklySummary, SummarizeError> {
        self.calls.lock().unwrap().push(SummarizeCall {
            transcripts: transcripts.to_vec(),
            had_location: location.is_some(),
            tz,
        });

        Ok(self.summary.clone())
    }

    fn name(&self) -> &str {
        "StaticSummarizer"
    }
}

/// A summarizer that always fails.
///
/// Useful for exercising the error path of week processing.
#[derive(Debug)]
pub struct FailingSummarizer {
    reason: String,
}

impl FailingSummarizer {
    /// Create a summarizer that fails with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(
        &self,
        _transcripts: &[TranscriptEntry],
        _location: Option<&LocationInsights>,
        _tz: Tz,
    ) -> Result<WeeklySummary, SummarizeError> {
        Err(SummarizeError::Failed(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "FailingSummarizer"
    }
}
