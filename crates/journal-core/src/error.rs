//! Error types for collaborator operations.

use thiserror::Error;

/// Errors that can occur while transcribing a single audio entry.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Configuration problem (missing API key, bad URL, etc.)
    #[error("transcriber configuration error: {0}")]
    Configuration(String),

    /// The referenced audio could not be read.
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Network-level failure talking to the service.
    #[error("transcription network error: {0}")]
    Network(String),

    /// The service accepted the request but failed to produce text.
    #[error("transcription failed: {0}")]
    Failed(String),
}

/// Errors that can occur while generating the weekly summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Configuration problem (missing API key, bad URL, etc.)
    #[error("summarizer configuration error: {0}")]
    Configuration(String),

    /// Network-level failure talking to the service.
    #[error("summarization network error: {0}")]
    Network(String),

    /// The service accepted the request but failed to produce a summary.
    #[error("summarization failed: {0}")]
    Failed(String),
}
