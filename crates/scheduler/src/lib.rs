//! The reflection core: week processing and the recurring scheduler.
//!
//! This crate drives murmur's weekly reflection lifecycle:
//!
//! - [`WeekProcessor`] - the week state machine (`recording -> processing ->
//!   {complete | error}`): transcription with per-entry isolation, location
//!   analysis, summarization, persistence
//! - [`ReflectionScheduler`] - the recurring ticker that finds due users,
//!   processes their weeks, rolls the window forward, and advances
//!   `next_reflection_at`
//! - [`schedule`] - next-occurrence and week-window math in the user's zone
//! - [`settings`] - the exposed operations: schedule edits, manual
//!   triggering, week reads
//! - [`weeks`] - week get-or-create for the entry-ingestion path
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use database::Database;
//! use mock_services::{StaticSummarizer, StaticTranscriber};
//! use scheduler::{ReflectionScheduler, WeekProcessor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:murmur.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let processor = Arc::new(WeekProcessor::new(
//!     db.clone(),
//!     Arc::new(StaticTranscriber::new("an entry")),
//!     Arc::new(StaticSummarizer::canned("a week")),
//! ));
//!
//! let handle = ReflectionScheduler::new(db, processor)
//!     .with_tick_period(Duration::from_secs(3600))
//!     .start();
//! # handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod error;
mod processor;
mod scheduler;

pub mod schedule;
pub mod settings;
pub mod weeks;

pub use error::{Result, SchedulerError};
pub use processor::WeekProcessor;
pub use scheduler::{ReflectionScheduler, SchedulerHandle, DEFAULT_TICK_PERIOD};
pub use settings::{trigger_reflection_now, update_schedule, week_insights, ScheduleChange};
pub use weeks::ensure_week_for;
