//! Scheduler and week-processing error types.

use database::{DatabaseError, ValidationError};
use journal_core::SummarizeError;
use thiserror::Error;

/// Errors from the scheduler, the week processor, and the settings surface.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Processing requested for a week already in `complete`.
    #[error("week {week_id} is already complete")]
    AlreadyComplete { week_id: String },

    /// Processing requested for a week currently in `processing`.
    #[error("week {week_id} is already being processed")]
    AlreadyProcessing { week_id: String },

    /// Processing requested for a week in the terminal `error` state.
    #[error("week {week_id} is in the error state and will not be retried")]
    InErrorState { week_id: String },

    /// Summarization collaborator failure (escalates the week to `error`).
    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    /// Malformed schedule field, rejected before any state mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failure.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The next-occurrence walk could not resolve a local instant.
    #[error("schedule computation failed: {0}")]
    Schedule(String),
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

impl SchedulerError {
    /// Whether this error is a state-machine conflict rejection.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            SchedulerError::AlreadyComplete { .. }
                | SchedulerError::AlreadyProcessing { .. }
                | SchedulerError::InErrorState { .. }
        )
    }
}
