//! The exposed operation surface: schedule updates, manual triggering, and
//! week reads.

use chrono::{DateTime, Utc};
use database::models::{User, Week};
use database::validation::{parse_timezone, validate_reflection_time, validate_weekday};
use database::{user, week, Database};
use tracing::info;

use crate::error::Result;
use crate::processor::WeekProcessor;
use crate::schedule;

/// A partial schedule-preference edit; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ScheduleChange {
    /// New reflection weekday, 0 = Sunday .. 6 = Saturday.
    pub weekday: Option<i64>,
    /// New local reflection time, "HH:MM" 24h.
    pub time: Option<String>,
    /// New IANA timezone name.
    pub timezone: Option<String>,
}

/// Apply a mid-cycle schedule edit.
///
/// Validation happens before any state mutation. `next_reflection_at` is
/// recomputed immediately, and if a `recording` week exists its open boundary
/// (`reflection_date`, `week_end`) moves to the new instant; `week_start` and
/// attached entries are untouched.
pub async fn update_schedule(
    db: &Database,
    user_id: &str,
    change: ScheduleChange,
    now: DateTime<Utc>,
) -> Result<User> {
    // Reject malformed fields before touching the user record.
    if let Some(weekday) = change.weekday {
        validate_weekday(weekday)?;
    }
    if let Some(ref time) = change.time {
        validate_reflection_time(time)?;
    }
    if let Some(ref timezone) = change.timezone {
        parse_timezone(timezone)?;
    }

    let mut updated = user::get_user(db.pool(), user_id).await?;

    if let Some(weekday) = change.weekday {
        updated.reflection_weekday = weekday;
    }
    if let Some(time) = change.time {
        updated.reflection_time = time;
    }
    if let Some(timezone) = change.timezone {
        updated.timezone = timezone;
    }

    let tz = parse_timezone(&updated.timezone)?;
    updated.next_reflection_at = schedule::next_occurrence_for(&updated, now)?;
    user::update_user(db.pool(), &updated).await?;

    info!(
        "User {} schedule updated; next reflection at {}",
        user_id, updated.next_reflection_at
    );

    if let Some(current) = week::latest_recording_week(db.pool(), user_id).await? {
        let (_, week_end) = schedule::week_window(updated.next_reflection_at, tz)?;
        week::move_open_boundary(
            db.pool(),
            &current.id,
            updated.next_reflection_at,
            week_end,
        )
        .await?;

        info!(
            "Moved week {} reflection boundary to {}",
            current.id, updated.next_reflection_at
        );
    }

    Ok(updated)
}

/// Manually process a week right now; same contract as the scheduled path,
/// including the state-conflict rejections.
pub async fn trigger_reflection_now(processor: &WeekProcessor, week_id: &str) -> Result<Week> {
    info!("Manual reflection trigger for week {}", week_id);
    processor.process_week(week_id).await
}

/// Read a week with its stored reflection and insights.
pub async fn week_insights(db: &Database, week_id: &str) -> Result<Week> {
    Ok(week::get_week(db.pool(), week_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use database::models::WeekStatus;
    use database::DatabaseError;
    use crate::error::SchedulerError;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed(db: &Database) -> (User, Week) {
        // Sunday 18:00 New York schedule, current week reflecting 2025-06-08.
        let reflection = New_York
            .with_ymd_and_hms(2025, 6, 8, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let user = User::new("iris@example.com", "Iris", reflection);
        user::create_user(db.pool(), &user).await.unwrap();

        let current = schedule::new_week(&user.id, reflection, New_York).unwrap();
        week::create_week(db.pool(), &current).await.unwrap();

        (user, current)
    }

    #[tokio::test]
    async fn test_edit_moves_only_the_open_boundary() {
        let db = test_db().await;
        let (user, current) = seed(&db).await;

        // Tuesday mid-week, switch Sunday -> Wednesday.
        let now = New_York
            .with_ymd_and_hms(2025, 6, 3, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let change = ScheduleChange {
            weekday: Some(3),
            ..Default::default()
        };

        let updated = update_schedule(&db, &user.id, change, now).await.unwrap();

        // Next reflection: Wednesday 2025-06-04 18:00 New York.
        let expected = New_York
            .with_ymd_and_hms(2025, 6, 4, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(updated.next_reflection_at, expected);

        let moved = week::get_week(db.pool(), &current.id).await.unwrap();
        assert_eq!(moved.reflection_date, expected);
        assert!(moved.week_end > expected);
        assert_eq!(moved.week_start, current.week_start);
        assert_eq!(moved.status, WeekStatus::Recording);
    }

    #[tokio::test]
    async fn test_invalid_change_rejected_before_mutation() {
        let db = test_db().await;
        let (user, current) = seed(&db).await;
        let now = Utc::now();

        for change in [
            ScheduleChange { weekday: Some(9), ..Default::default() },
            ScheduleChange { time: Some("25:00".to_string()), ..Default::default() },
            ScheduleChange { timezone: Some("Nowhere/Else".to_string()), ..Default::default() },
        ] {
            assert!(matches!(
                update_schedule(&db, &user.id, change, now).await,
                Err(SchedulerError::Validation(_))
            ));
        }

        // Nothing changed.
        let unchanged = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(unchanged.reflection_weekday, user.reflection_weekday);
        assert_eq!(unchanged.next_reflection_at, user.next_reflection_at);
        let untouched = week::get_week(db.pool(), &current.id).await.unwrap();
        assert_eq!(untouched.reflection_date, current.reflection_date);
    }

    #[tokio::test]
    async fn test_timezone_change_recomputes_in_new_zone() {
        let db = test_db().await;
        let (user, _current) = seed(&db).await;

        let now = New_York
            .with_ymd_and_hms(2025, 6, 3, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let change = ScheduleChange {
            timezone: Some("Europe/Berlin".to_string()),
            ..Default::default()
        };

        let updated = update_schedule(&db, &user.id, change, now).await.unwrap();

        let local = updated
            .next_reflection_at
            .with_timezone(&chrono_tz::Europe::Berlin);
        assert_eq!(local.format("%w %H:%M").to_string(), "0 18:00");
    }

    #[tokio::test]
    async fn test_week_insights_missing_week() {
        let db = test_db().await;
        assert!(matches!(
            week_insights(&db, "nope").await,
            Err(SchedulerError::Database(DatabaseError::NotFound { .. }))
        ));
    }
}
