//! Week get-or-create for the entry-ingestion path.

use chrono::{DateTime, Utc};
use database::models::{User, Week};
use database::validation::parse_timezone;
use database::{week, Database, DatabaseError};
use tracing::info;

use crate::error::Result;
use crate::schedule;

/// Find or create the week an entry recorded at `recorded_at` belongs to.
///
/// The owning period is identified by the next scheduled reflection after the
/// recording instant; when no week exists for that `(year, week_number)` yet,
/// one is created with the standard 7-day window. A concurrent creation for
/// the same period is absorbed by re-reading.
pub async fn ensure_week_for(
    db: &Database,
    user: &User,
    recorded_at: DateTime<Utc>,
) -> Result<Week> {
    let tz = parse_timezone(&user.timezone)?;
    let reflection = schedule::next_occurrence_for(user, recorded_at)?;
    let (year, week_number) = schedule::week_period(reflection, tz);

    if let Some(existing) = week::find_week_by_period(db.pool(), &user.id, year, week_number).await? {
        return Ok(existing);
    }

    let fresh = schedule::new_week(&user.id, reflection, tz)?;
    match week::create_week(db.pool(), &fresh).await {
        Ok(()) => {
            info!(
                "Created week {}-W{} for user {} from incoming entry",
                year, week_number, user.id
            );
            Ok(fresh)
        }
        Err(DatabaseError::AlreadyExists { .. }) => {
            let existing = week::find_week_by_period(db.pool(), &user.id, year, week_number)
                .await?
                .ok_or(DatabaseError::NotFound {
                    entity: "Week",
                    id: format!("{}/{}-W{}", user.id, year, week_number),
                })?;
            Ok(existing)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use database::models::WeekStatus;
    use database::user;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_creates_week_for_new_period() {
        let db = test_db().await;

        let reflection = New_York
            .with_ymd_and_hms(2025, 6, 8, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let owner = User::new("leo@example.com", "Leo", reflection);
        user::create_user(db.pool(), &owner).await.unwrap();

        // Tuesday recording; the week should reflect on the upcoming Sunday.
        let recorded = New_York
            .with_ymd_and_hms(2025, 6, 3, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let created = ensure_week_for(&db, &owner, recorded).await.unwrap();

        assert_eq!(created.status, WeekStatus::Recording);
        assert_eq!(created.reflection_date, reflection);
        assert!(created.week_start <= recorded && recorded <= created.week_end);
    }

    #[tokio::test]
    async fn test_returns_existing_week_for_same_period() {
        let db = test_db().await;

        let reflection = New_York
            .with_ymd_and_hms(2025, 6, 8, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let owner = User::new("mia@example.com", "Mia", reflection);
        user::create_user(db.pool(), &owner).await.unwrap();

        let monday = New_York
            .with_ymd_and_hms(2025, 6, 2, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let friday = New_York
            .with_ymd_and_hms(2025, 6, 6, 20, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let first = ensure_week_for(&db, &owner, monday).await.unwrap();
        let second = ensure_week_for(&db, &owner, friday).await.unwrap();
        assert_eq!(first.id, second.id);

        let weeks = week::list_weeks(db.pool(), &owner.id).await.unwrap();
        assert_eq!(weeks.len(), 1);
    }
}
