//! Week CRUD, status transitions, and period queries.

use chrono::{DateTime, Utc};
use journal_core::TranscriptEntry;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Week, WeekInsights, WeekStatus};

const SELECT_WEEK: &str = r#"
    SELECT id, user_id, week_number, year, week_start, week_end,
           reflection_date, status, transcriptions, summary, insights,
           processed_at, created_at
    FROM weeks
"#;

/// Create a new week. The `(user_id, year, week_number)` index enforces one
/// week per period.
pub async fn create_week(pool: &SqlitePool, week: &Week) -> Result<()> {
    let transcriptions = serde_json::to_string(&week.transcriptions)?;
    let insights = week
        .insights
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO weeks (id, user_id, week_number, year, week_start, week_end,
                           reflection_date, status, transcriptions, summary,
                           insights, processed_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&week.id)
    .bind(&week.user_id)
    .bind(week.week_number)
    .bind(week.year)
    .bind(week.week_start)
    .bind(week.week_end)
    .bind(week.reflection_date)
    .bind(week.status.as_str())
    .bind(transcriptions)
    .bind(&week.summary)
    .bind(insights)
    .bind(week.processed_at)
    .bind(week.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Week",
                    id: format!("{}/{}-W{}", week.user_id, week.year, week.week_number),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a week by ID.
pub async fn get_week(pool: &SqlitePool, id: &str) -> Result<Week> {
    sqlx::query_as::<_, Week>(&format!("{} WHERE id = ?", SELECT_WEEK))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Week",
            id: id.to_string(),
        })
}

/// Find a user's week for a specific ISO period, if one exists.
pub async fn find_week_by_period(
    pool: &SqlitePool,
    user_id: &str,
    year: i64,
    week_number: i64,
) -> Result<Option<Week>> {
    let week = sqlx::query_as::<_, Week>(&format!(
        "{} WHERE user_id = ? AND year = ? AND week_number = ?",
        SELECT_WEEK
    ))
    .bind(user_id)
    .bind(year)
    .bind(week_number)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// The user's `recording` week whose reflection date is at or before `now`;
/// most recent reflection date wins when several qualify.
pub async fn current_recording_week(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Week>> {
    let week = sqlx::query_as::<_, Week>(&format!(
        "{} WHERE user_id = ? AND status = 'recording' AND reflection_date <= ?
         ORDER BY reflection_date DESC LIMIT 1",
        SELECT_WEEK
    ))
    .bind(user_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// The user's most recent `recording` week regardless of reflection date.
/// Used by the settings-update path to move the open boundary.
pub async fn latest_recording_week(pool: &SqlitePool, user_id: &str) -> Result<Option<Week>> {
    let week = sqlx::query_as::<_, Week>(&format!(
        "{} WHERE user_id = ? AND status = 'recording'
         ORDER BY reflection_date DESC LIMIT 1",
        SELECT_WEEK
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(week)
}

/// List a user's weeks, newest reflection first.
pub async fn list_weeks(pool: &SqlitePool, user_id: &str) -> Result<Vec<Week>> {
    let weeks = sqlx::query_as::<_, Week>(&format!(
        "{} WHERE user_id = ? ORDER BY reflection_date DESC",
        SELECT_WEEK
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(weeks)
}

/// Atomically move a `recording` week to `processing`.
///
/// This is the admission-control point for week processing: the conditional
/// update commits the status before any blocking work happens, and a
/// concurrent caller observes `false` (zero rows matched) instead of entering
/// twice.
pub async fn try_begin_processing(pool: &SqlitePool, week_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE weeks SET status = 'processing'
        WHERE id = ? AND status = 'recording'
        "#,
    )
    .bind(week_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Persist the transcription list on a week.
///
/// Called as soon as transcription finishes so partial progress survives a
/// later summarization failure.
pub async fn save_transcriptions(
    pool: &SqlitePool,
    week_id: &str,
    transcriptions: &[TranscriptEntry],
) -> Result<()> {
    let json = serde_json::to_string(transcriptions)?;

    let result = sqlx::query("UPDATE weeks SET transcriptions = ? WHERE id = ?")
        .bind(json)
        .bind(week_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Week",
            id: week_id.to_string(),
        });
    }

    Ok(())
}

/// Mark a week complete, storing the reflection output.
pub async fn mark_complete(
    pool: &SqlitePool,
    week_id: &str,
    summary: Option<&str>,
    insights: Option<&WeekInsights>,
    processed_at: DateTime<Utc>,
) -> Result<()> {
    let insights_json = insights.map(serde_json::to_string).transpose()?;

    let result = sqlx::query(
        r#"
        UPDATE weeks
        SET status = 'complete', summary = ?, insights = ?, processed_at = ?
        WHERE id = ?
        "#,
    )
    .bind(summary)
    .bind(insights_json)
    .bind(processed_at)
    .bind(week_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Week",
            id: week_id.to_string(),
        });
    }

    Ok(())
}

/// Force a week into the terminal `error` state.
pub async fn mark_error(pool: &SqlitePool, week_id: &str) -> Result<()> {
    let result = sqlx::query("UPDATE weeks SET status = 'error' WHERE id = ?")
        .bind(week_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Week",
            id: week_id.to_string(),
        });
    }

    Ok(())
}

/// Move the open boundary (reflection date and week end) of a `recording`
/// week. The week start is deliberately left untouched, as are its entries.
pub async fn move_open_boundary(
    pool: &SqlitePool,
    week_id: &str,
    reflection_date: DateTime<Utc>,
    week_end: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE weeks SET reflection_date = ?, week_end = ?
        WHERE id = ? AND status = 'recording'
        "#,
    )
    .bind(reflection_date)
    .bind(week_end)
    .bind(week_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Week",
            id: week_id.to_string(),
        });
    }

    Ok(())
}
