//! Core traits and types for murmur's external collaborators.
//!
//! This crate provides the shared interface between the reflection pipeline
//! and the services it consumes. It defines:
//!
//! - [`Transcriber`] - The trait audio-to-text services implement
//! - [`Summarizer`] - The trait weekly-summary services implement
//! - [`TranscriptEntry`] / [`WeeklySummary`] - Data carried between steps
//! - [`TranscribeError`] / [`SummarizeError`] - Collaborator error types
//! - [`prompt`] / [`parse`] - The textual contract with the summarization
//!   model: prompt construction and labeled-section response parsing
//!
//! # Example
//!
//! ```rust
//! use journal_core::{Summarizer, SummarizeError, TranscriptEntry, WeeklySummary};
//! use async_trait::async_trait;
//!
//! struct CannedSummarizer;
//!
//! #[async_trait]
//! impl Summarizer for CannedSummarizer {
//!     async fn summarize(
//!         &self,
//!         transcripts: &[TranscriptEntry],
//!         location: Option<&location_insights::LocationInsights>,
//!         tz: chrono_tz::Tz,
//!     ) -> Result<WeeklySummary, SummarizeError> {
//!         let _ = (transcripts, location, tz);
//!         Ok(WeeklySummary::default())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedSummarizer"
//!     }
//! }
//! ```

mod error;
mod types;
mod trait_def;

pub mod parse;
pub mod prompt;

pub use error::{SummarizeError, TranscribeError};
pub use trait_def::{Summarizer, Transcriber};
pub use types::{TranscriptEntry, WeeklySummary};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
