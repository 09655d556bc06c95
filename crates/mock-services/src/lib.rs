//! Mock collaborator implementations for testing the reflection pipeline.
//!
//! This crate provides test doubles for murmur's collaborator traits:
//!
//! - [`StaticTranscriber`] - same text for every entry, records calls
//! - [`ScriptedTranscriber`] - per-audio-ref successes and failures
//! - [`StaticSummarizer`] - canned [`WeeklySummary`], records calls
//! - [`FailingSummarizer`] - always fails
//!
//! For production processing, use the `openai-services` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_services::{StaticTranscriber, Transcriber};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transcriber = StaticTranscriber::new("went for a long walk");
//!     let text = transcriber.transcribe("/audio/mon.webm").await.unwrap();
//!     assert_eq!(text, "went for a long walk");
//! }
//! ```

mod summarizer;
mod transcriber;

pub use summarizer::{FailingSummarizer, StaticSummarizer, SummarizeCall};
pub use transcriber::{ScriptedTranscriber, StaticTranscriber};

// Re-export the trait surface for convenience
pub use journal_core::{
    async_trait, SummarizeError, Summarizer, TranscribeError, Transcriber, TranscriptEntry,
    WeeklySummary,
};
