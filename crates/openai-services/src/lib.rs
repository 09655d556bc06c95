//! OpenAI-backed implementations of murmur's collaborator traits.
//!
//! This crate provides:
//!
//! - [`WhisperTranscriber`] - audio-to-text via the audio transcriptions API
//! - [`ChatSummarizer`] - weekly reflections via chat completions
//!
//! Both share an [`OpenAiConfig`] loaded from the environment:
//!
//! ```no_run
//! use openai_services::{ChatSummarizer, OpenAiConfig, WhisperTranscriber};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAiConfig::from_env()?;
//! let transcriber = WhisperTranscriber::new(config.clone())?;
//! let summarizer = ChatSummarizer::new(config)?;
//! # Ok(())
//! # }
//! ```

mod api_types;
mod config;
mod summarizer;
mod transcriber;

pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use summarizer::ChatSummarizer;
pub use transcriber::WhisperTranscriber;

// Re-export the trait surface for convenience
pub use journal_core::{SummarizeError, Summarizer, TranscribeError, Transcriber};
