//! Entry CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Entry, EntryLocation};
use crate::validation::validate_coordinates;

const SELECT_ENTRY: &str = r#"
    SELECT id, user_id, week_id, audio_ref, duration_secs,
           recorded_at, location, created_at
    FROM entries
"#;

/// Create a new entry.
///
/// A location payload is validated before it is persisted; out-of-range
/// coordinates reject the whole insert.
pub async fn create_entry(pool: &SqlitePool, entry: &Entry) -> Result<()> {
    if let Some(loc) = entry.location.as_ref() {
        validate_coordinates(loc.latitude, loc.longitude)?;
    }
    let location = entry
        .location
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO entries (id, user_id, week_id, audio_ref, duration_secs,
                             recorded_at, location, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.user_id)
    .bind(&entry.week_id)
    .bind(&entry.audio_ref)
    .bind(entry.duration_secs)
    .bind(entry.recorded_at)
    .bind(location)
    .bind(entry.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get an entry by ID.
pub async fn get_entry(pool: &SqlitePool, id: &str) -> Result<Entry> {
    sqlx::query_as::<_, Entry>(&format!("{} WHERE id = ?", SELECT_ENTRY))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Entry",
            id: id.to_string(),
        })
}

/// All entries for a week, ascending by recording time.
///
/// Week processing depends on this order: transcripts are collected and the
/// summary prompt is built in recording order.
pub async fn entries_for_week(pool: &SqlitePool, week_id: &str) -> Result<Vec<Entry>> {
    let entries = sqlx::query_as::<_, Entry>(&format!(
        "{} WHERE week_id = ? ORDER BY recorded_at ASC",
        SELECT_ENTRY
    ))
    .bind(week_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Replace an entry's location payload.
///
/// Entries are otherwise immutable; this exists for the asynchronous
/// reverse-geocoding enrichment that fills in address fields.
pub async fn save_location(pool: &SqlitePool, entry_id: &str, location: &EntryLocation) -> Result<()> {
    validate_coordinates(location.latitude, location.longitude)?;
    let json = serde_json::to_string(location)?;

    let result = sqlx::query("UPDATE entries SET location = ? WHERE id = ?")
        .bind(json)
        .bind(entry_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Entry",
            id: entry_id.to_string(),
        });
    }

    Ok(())
}

/// Delete an entry by ID.
pub async fn delete_entry(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM entries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Entry",
            id: id.to_string(),
        });
    }

    Ok(())
}
