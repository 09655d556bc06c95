//! User CRUD and schedule queries.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, timezone, reflection_weekday,
                           reflection_time, next_reflection_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.timezone)
    .bind(user.reflection_weekday)
    .bind(&user.reflection_time)
    .bind(user.next_reflection_at)
    .bind(user.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, timezone, reflection_weekday,
               reflection_time, next_reflection_at, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by email.
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, timezone, reflection_weekday,
               reflection_time, next_reflection_at, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: email.to_string(),
    })
}

/// Update a user's mutable fields (name and schedule preference).
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?, timezone = ?, reflection_weekday = ?,
            reflection_time = ?, next_reflection_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.name)
    .bind(&user.timezone)
    .bind(user.reflection_weekday)
    .bind(&user.reflection_time)
    .bind(user.next_reflection_at)
    .bind(&user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: user.id.clone(),
        });
    }

    Ok(())
}

/// Find all users whose reflection instant is at or before `now`.
pub async fn find_due_users(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, timezone, reflection_weekday,
               reflection_time, next_reflection_at, created_at
        FROM users
        WHERE next_reflection_at <= ?
        ORDER BY next_reflection_at
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
