use chrono::NaiveDate;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::User;

/// Fetch a user by platform id, creating the row on first sight.
/// Name fields of an existing row are left alone.
pub async fn get_or_create<'e, E>(
    executor: E,
    platform_id: &str,
    display_name: Option<&str>,
    username: Option<&str>,
) -> Result<User, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    // The no-op update makes RETURNING yield the existing row on conflict
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (platform_id, display_name, username)
        VALUES ($1, $2, $3)
        ON CONFLICT (platform_id) DO UPDATE SET platform_id = EXCLUDED.platform_id
        RETURNING *
        "#
    )
    .bind(platform_id)
    .bind(display_name)
    .bind(username)
    .fetch_one(executor)
    .await
}

pub async fn get<'e, E>(executor: E, platform_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE platform_id = $1")
        .bind(platform_id)
        .fetch_optional(executor)
        .await
}

/// Fetch a user and hold a row lock until the surrounding transaction ends
pub async fn lock<'e, E>(executor: E, platform_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE platform_id = $1 FOR UPDATE")
        .bind(platform_id)
        .fetch_optional(executor)
        .await
}

/// Mark a user as confirmed. Returns `None` if the user is unknown.
pub async fn confirm<'e, E>(executor: E, platform_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET confirmed = TRUE, updated_at = NOW()
        WHERE platform_id = $1
        RETURNING *
        "#
    )
    .bind(platform_id)
    .fetch_optional(executor)
    .await
}

pub async fn set_blocked_until<'e, E>(
    executor: E,
    user_id: Uuid,
    until: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE users
        SET blocked_until = $2, updated_at = NOW()
        WHERE id = $1
        "#
    )
    .bind(user_id)
    .bind(until)
    .execute(executor)
    .await?;

    Ok(())
}

/// Remove a user together with their strikes and bans (FK cascade)
pub async fn delete<'e, E>(executor: E, platform_id: &str) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM users WHERE platform_id = $1")
        .bind(platform_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
