//! The week-processing state machine.
//!
//! `recording -> processing -> {complete | error}`. Complete and error are
//! terminal; an errored week is never retried automatically, a new week is
//! created for the next period instead.

use std::sync::Arc;

use chrono::Utc;
use database::models::{Entry, Week, WeekInsights, WeekStatus};
use database::validation::parse_timezone;
use database::{entry, user, week, Database};
use journal_core::{Summarizer, Transcriber, TranscriptEntry};
use location_insights::{analyze_week, Coordinates, EntryPoint};
use tracing::{debug, error, info, warn};

use crate::error::{Result, SchedulerError};

/// Drives a week through transcription, location analysis, and summarization.
///
/// Collaborators are injected; the processor owns no ambient state beyond the
/// database handle, so one instance serves every user.
pub struct WeekProcessor {
    db: Database,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
}

impl WeekProcessor {
    /// Create a processor with the given collaborators.
    pub fn new(
        db: Database,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        info!(
            "WeekProcessor using transcriber: {}, summarizer: {}",
            transcriber.name(),
            summarizer.name()
        );

        Self {
            db,
            transcriber,
            summarizer,
        }
    }

    /// Process a `recording` week into its weekly reflection.
    ///
    /// Rejects with a state conflict when the week is not in `recording`.
    /// The `processing` status is committed before any blocking work, so a
    /// concurrent invocation for the same week refuses to re-enter. Any
    /// failure after admission forces the week into the terminal `error`
    /// state and is re-raised.
    pub async fn process_week(&self, week_id: &str) -> Result<Week> {
        let week = week::get_week(self.db.pool(), week_id).await?;

        self.check_admissible(&week)?;

        if !week::try_begin_processing(self.db.pool(), week_id).await? {
            // Lost the admission race; report the state that beat us.
            let current = week::get_week(self.db.pool(), week_id).await?;
            self.check_admissible(&current)?;
            return Err(SchedulerError::AlreadyProcessing {
                week_id: week_id.to_string(),
            });
        }

        info!(
            "Processing week {} ({}-W{}) for user {}",
            week.id, week.year, week.week_number, week.user_id
        );

        match self.run_pipeline(&week).await {
            Ok(processed) => {
                info!("Week {} complete", week.id);
                Ok(processed)
            }
            Err(e) => {
                error!("Week {} processing failed: {}", week.id, e);
                if let Err(mark_err) = week::mark_error(self.db.pool(), &week.id).await {
                    error!("Failed to mark week {} as errored: {}", week.id, mark_err);
                }
                Err(e)
            }
        }
    }

    fn check_admissible(&self, week: &Week) -> Result<()> {
        match week.status {
            WeekStatus::Recording => Ok(()),
            WeekStatus::Complete => Err(SchedulerError::AlreadyComplete {
                week_id: week.id.clone(),
            }),
            WeekStatus::Processing => Err(SchedulerError::AlreadyProcessing {
                week_id: week.id.clone(),
            }),
            WeekStatus::Error => Err(SchedulerError::InErrorState {
                week_id: week.id.clone(),
            }),
        }
    }

    /// Everything after admission control. Errors here escalate the week to
    /// `error` in the caller.
    async fn run_pipeline(&self, week: &Week) -> Result<Week> {
        let owner = user::get_user(self.db.pool(), &week.user_id).await?;
        let tz = parse_timezone(&owner.timezone)?;

        let entries = entry::entries_for_week(self.db.pool(), &week.id).await?;

        if entries.is_empty() {
            debug!("Week {} has no entries, completing immediately", week.id);
            week::mark_complete(self.db.pool(), &week.id, None, None, Utc::now()).await?;
            return Ok(week::get_week(self.db.pool(), &week.id).await?);
        }

        let transcripts = self.transcribe_entries(&entries).await;

        // Persist before summarization so partial progress survives a failure.
        week::save_transcriptions(self.db.pool(), &week.id, &transcripts).await?;

        let location = analyze_week(&located_points(&entries));
        if let Some(ref insights) = location {
            debug!(
                "Week {} location: {} place(s), {:.1}km traveled",
                week.id, insights.total_unique_locations, insights.distance_traveled_km
            );
        }

        let summary = self
            .summarizer
            .summarize(&transcripts, location.as_ref(), tz)
            .await?;

        let insights = WeekInsights {
            mood_trend: summary.mood_trend,
            key_themes: summary.key_themes,
            highlights: summary.highlights,
            location_note: summary.location_note,
            location,
        };

        week::mark_complete(
            self.db.pool(),
            &week.id,
            Some(&summary.summary),
            Some(&insights),
            Utc::now(),
        )
        .await?;

        Ok(week::get_week(self.db.pool(), &week.id).await?)
    }

    /// Transcribe entries in recording-time order.
    ///
    /// A per-entry failure becomes a placeholder record rather than aborting
    /// the batch; one bad audio file must not block the rest of the week.
    async fn transcribe_entries(&self, entries: &[Entry]) -> Vec<TranscriptEntry> {
        let mut transcripts = Vec::with_capacity(entries.len());

        for entry in entries {
            match self.transcriber.transcribe(&entry.audio_ref).await {
                Ok(text) => {
                    transcripts.push(TranscriptEntry::new(&entry.id, text, entry.recorded_at));
                }
                Err(e) => {
                    warn!("Transcription of entry {} failed: {}", entry.id, e);
                    transcripts.push(TranscriptEntry::failed(
                        &entry.id,
                        &e.to_string(),
                        entry.recorded_at,
                    ));
                }
            }
        }

        transcripts
    }
}

/// Entries carrying valid coordinates, as analytics input. Entries whose
/// stored coordinates fail validation are treated as unlocated.
fn located_points(entries: &[Entry]) -> Vec<EntryPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let loc = entry.location.as_ref()?;
            let coords = Coordinates::new(loc.latitude, loc.longitude).ok()?;
            Some(EntryPoint::new(&entry.id, coords, entry.recorded_at))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use database::models::{EntryLocation, User};
    use mock_services::{
        FailingSummarizer, ScriptedTranscriber, StaticSummarizer, StaticTranscriber,
    };

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_user_and_week(db: &Database) -> (User, Week) {
        let reflection = Utc.with_ymd_and_hms(2025, 6, 8, 22, 0, 0).unwrap();
        let user = User::new("maya@example.com", "Maya", reflection);
        user::create_user(db.pool(), &user).await.unwrap();

        let week = Week::new(
            user.id.clone(),
            2025,
            23,
            reflection - Duration::days(6),
            reflection,
            reflection,
        );
        week::create_week(db.pool(), &week).await.unwrap();

        (user, week)
    }

    async fn add_entry(db: &Database, user: &User, week: &Week, audio_ref: &str, hour: u32) -> Entry {
        let recorded = Utc.with_ymd_and_hms(2025, 6, 3, hour, 0, 0).unwrap();
        let entry = Entry::new(&user.id, &week.id, audio_ref, 12.0, recorded, None);
        entry::create_entry(db.pool(), &entry).await.unwrap();
        entry
    }

    fn processor(db: &Database) -> WeekProcessor {
        WeekProcessor::new(
            db.clone(),
            Arc::new(StaticTranscriber::new("a day in the life")),
            Arc::new(StaticSummarizer::canned("a good week")),
        )
    }

    #[tokio::test]
    async fn test_zero_entry_week_completes_without_insights() {
        let db = test_db().await;
        let (_user, week) = seed_user_and_week(&db).await;

        let processed = processor(&db).process_week(&week.id).await.unwrap();

        assert_eq!(processed.status, WeekStatus::Complete);
        assert!(processed.processed_at.is_some());
        assert!(processed.transcriptions.is_empty());
        assert!(processed.summary.is_none());
        assert!(processed.insights.is_none());
    }

    #[tokio::test]
    async fn test_rejects_non_recording_states() {
        let db = test_db().await;
        let proc = processor(&db);

        let (_user, week) = seed_user_and_week(&db).await;
        week::mark_complete(db.pool(), &week.id, None, None, Utc::now())
            .await
            .unwrap();
        assert!(matches!(
            proc.process_week(&week.id).await,
            Err(SchedulerError::AlreadyComplete { .. })
        ));

        // Fields untouched by the rejected attempt.
        let unchanged = week::get_week(db.pool(), &week.id).await.unwrap();
        assert_eq!(unchanged.status, WeekStatus::Complete);
        assert!(unchanged.transcriptions.is_empty());

        week::try_begin_processing(db.pool(), &week.id).await.unwrap();
        let fresh = Week::new(week.user_id.clone(), 2025, 24, week.week_start, week.week_end, week.reflection_date);
        week::create_week(db.pool(), &fresh).await.unwrap();
        week::try_begin_processing(db.pool(), &fresh.id).await.unwrap();
        assert!(matches!(
            proc.process_week(&fresh.id).await,
            Err(SchedulerError::AlreadyProcessing { .. })
        ));

        week::mark_error(db.pool(), &fresh.id).await.unwrap();
        assert!(matches!(
            proc.process_week(&fresh.id).await,
            Err(SchedulerError::InErrorState { .. })
        ));
    }

    #[tokio::test]
    async fn test_entry_level_transcription_isolation() {
        let db = test_db().await;
        let (user, week) = seed_user_and_week(&db).await;

        add_entry(&db, &user, &week, "/audio/mon.webm", 9).await;
        add_entry(&db, &user, &week, "/audio/wed.webm", 12).await;
        add_entry(&db, &user, &week, "/audio/fri.webm", 18).await;

        let transcriber = ScriptedTranscriber::new()
            .with_text("/audio/mon.webm", "monday entry")
            .with_failure("/audio/wed.webm", "corrupt audio")
            .with_text("/audio/fri.webm", "friday entry");
        let summarizer = Arc::new(StaticSummarizer::canned("a mixed week"));

        let proc = WeekProcessor::new(db.clone(), Arc::new(transcriber), summarizer.clone());
        let processed = proc.process_week(&week.id).await.unwrap();

        assert_eq!(processed.status, WeekStatus::Complete);
        assert_eq!(processed.transcriptions.len(), 3);
        assert_eq!(processed.transcriptions[0].text, "monday entry");
        assert!(processed.transcriptions[1].is_placeholder());
        assert!(processed.transcriptions[1].text.contains("corrupt audio"));
        assert_eq!(processed.transcriptions[2].text, "friday entry");

        // The summarizer saw all three, in recording order.
        let calls = summarizer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].transcripts.len(), 3);
        assert_eq!(calls[0].transcripts[0].text, "monday entry");
    }

    #[tokio::test]
    async fn test_summarizer_failure_marks_week_errored() {
        let db = test_db().await;
        let (user, week) = seed_user_and_week(&db).await;
        add_entry(&db, &user, &week, "/audio/mon.webm", 9).await;

        let proc = WeekProcessor::new(
            db.clone(),
            Arc::new(StaticTranscriber::new("an entry")),
            Arc::new(FailingSummarizer::new("model unavailable")),
        );

        let result = proc.process_week(&week.id).await;
        assert!(matches!(result, Err(SchedulerError::Summarize(_))));

        let errored = week::get_week(db.pool(), &week.id).await.unwrap();
        assert_eq!(errored.status, WeekStatus::Error);
        // Transcriptions persisted before the failing step survive.
        assert_eq!(errored.transcriptions.len(), 1);
        assert!(errored.summary.is_none());
    }

    #[tokio::test]
    async fn test_location_insights_attached_when_entries_located() {
        let db = test_db().await;
        let (user, week) = seed_user_and_week(&db).await;

        let recorded = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap();
        let entry = Entry::new(
            &user.id,
            &week.id,
            "/audio/home.webm",
            8.0,
            recorded,
            Some(EntryLocation::new(40.7128, -74.0060, recorded)),
        );
        entry::create_entry(db.pool(), &entry).await.unwrap();

        let summarizer = Arc::new(StaticSummarizer::canned("a week at home"));
        let proc = WeekProcessor::new(
            db.clone(),
            Arc::new(StaticTranscriber::new("at home")),
            summarizer.clone(),
        );

        let processed = proc.process_week(&week.id).await.unwrap();

        let insights = processed.insights.unwrap();
        let location = insights.location.unwrap();
        assert_eq!(location.total_unique_locations, 1);
        assert_eq!(location.time_at_home_percent, 100);
        assert!(summarizer.calls()[0].had_location);
    }
}
