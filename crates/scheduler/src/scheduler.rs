//! The recurring reflection ticker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use database::models::User;
use database::validation::parse_timezone;
use database::{user, week, Database, DatabaseError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::processor::WeekProcessor;
use crate::schedule;

/// Default tick period: hourly, like the original cron cadence.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(3600);

/// Periodically finds due users and drives their weeks through processing.
///
/// Each tick is independent; each user within a tick is independent. A
/// failure processing one user is logged and the tick continues, and a
/// processing failure for one week never prevents that user's schedule from
/// advancing.
pub struct ReflectionScheduler {
    db: Database,
    processor: Arc<WeekProcessor>,
    tick_period: Duration,
}

/// Handle to a running scheduler task.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the scheduler to stop and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Scheduler task panicked: {}", e);
        }
    }
}

impl ReflectionScheduler {
    /// Create a scheduler with the default hourly tick.
    pub fn new(db: Database, processor: Arc<WeekProcessor>) -> Self {
        Self {
            db,
            processor,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    /// Set the tick period. Cadence is a tunable, not a correctness knob.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Spawn the ticker task.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        info!("Starting reflection scheduler (tick: {:?})", self.tick_period);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.tick_period);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = self.run_tick(Utc::now()).await {
                            error!("Scheduler tick failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("Reflection scheduler shutting down");
                        break;
                    }
                }
            }
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// One scheduler pass: process every user due at `now`.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<()> {
        let due = user::find_due_users(self.db.pool(), now).await?;

        if due.is_empty() {
            debug!("No users due for reflection");
            return Ok(());
        }

        info!("{} user(s) due for reflection", due.len());

        for user in &due {
            if let Err(e) = self.process_user(user, now).await {
                error!("Reflection cycle for user {} failed: {}", user.id, e);
            }
        }

        Ok(())
    }

    /// One user's full reflection cycle.
    ///
    /// A processing failure marks the week errored (inside the processor) but
    /// the next week is still created and the schedule still advances; a user
    /// must never get stuck because one week failed.
    async fn process_user(&self, user: &User, now: DateTime<Utc>) -> Result<()> {
        let tz = parse_timezone(&user.timezone)?;

        match week::current_recording_week(self.db.pool(), &user.id, now).await? {
            Some(current) => match self.processor.process_week(&current.id).await {
                Ok(_) => {}
                Err(e) if e.is_state_conflict() => {
                    warn!("Skipping week {} for user {}: {}", current.id, user.id, e);
                }
                Err(e) => {
                    error!(
                        "Week {} for user {} ended in error ({}); advancing schedule anyway",
                        current.id, user.id, e
                    );
                }
            },
            None => {
                // Still advance the schedule below, otherwise this user is
                // re-selected every tick forever.
                warn!("User {} is due but has no recording week", user.id);
            }
        }

        let next_reflection = user.next_reflection_at + chrono::Duration::weeks(1);
        let next_week = schedule::new_week(&user.id, next_reflection, tz)?;

        match week::create_week(self.db.pool(), &next_week).await {
            Ok(()) => {
                info!(
                    "Created week {}-W{} for user {}",
                    next_week.year, next_week.week_number, user.id
                );
            }
            Err(DatabaseError::AlreadyExists { .. }) => {
                debug!(
                    "Week {}-W{} already exists for user {}",
                    next_week.year, next_week.week_number, user.id
                );
            }
            Err(e) => return Err(e.into()),
        }

        let mut updated = user.clone();
        updated.next_reflection_at = schedule::next_occurrence_for(user, now)?;
        user::update_user(self.db.pool(), &updated).await?;

        debug!(
            "User {} next reflection at {}",
            user.id, updated.next_reflection_at
        );

        Ok(())
    }
}
