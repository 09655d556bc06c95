//! Collaborator trait definitions.

use async_trait::async_trait;
use chrono_tz::Tz;
use location_insights::LocationInsights;

use crate::error::{SummarizeError, TranscribeError};
use crate::types::{TranscriptEntry, WeeklySummary};

/// An audio-to-text transcription service.
///
/// Implementations are injected into the week processor; one call is made per
/// entry, in recording-time order. A failure is scoped to that entry and must
/// not affect sibling calls.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio referenced by `audio_ref` (a path or URL as
    /// stored on the entry) into plain text.
    async fn transcribe(&self, audio_ref: &str) -> Result<String, TranscribeError>;

    /// Human-readable implementation name, used in logs.
    fn name(&self) -> &str;
}

/// A weekly-reflection summarization service.
///
/// Receives the week's transcripts in recording-time order (order matters:
/// the prompt tells the week as a narrative) plus the location insight when
/// one exists.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce the structured weekly reflection. `tz` is the journal owner's
    /// timezone, used to render entry timestamps the way the user lived them.
    async fn summarize(
        &self,
        transcripts: &[TranscriptEntry],
        location: Option<&LocationInsights>,
        tz: Tz,
    ) -> Result<WeeklySummary, SummarizeError>;

    /// Human-readable implementation name, used in logs.
    fn name(&self) -> &str;
}
