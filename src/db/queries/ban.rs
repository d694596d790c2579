use chrono::Utc;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::Ban;
use crate::db::window::window_start;

pub async fn create<'e, E>(
    executor: E,
    user_id: Uuid,
    reason: Option<&str>,
    period_days: u32,
) -> Result<Ban, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Ban>(
        r#"
        INSERT INTO bans (user_id, reason, period)
        VALUES ($1, $2, $3)
        RETURNING *
        "#
    )
    .bind(user_id)
    .bind(reason)
    .bind(i32::try_from(period_days).unwrap_or(i32::MAX))
    .fetch_one(executor)
    .await
}

/// Count a user's bans from the last `window_days`.
/// `None` means there is no such user.
pub async fn count_recent<'e, E>(
    executor: E,
    platform_id: &str,
    window_days: u32,
) -> Result<Option<i64>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT (
            SELECT COUNT(*) FROM bans b
            WHERE b.user_id = u.id AND b.created_at >= $2
        )
        FROM users u
        WHERE u.platform_id = $1
        "#
    )
    .bind(platform_id)
    .bind(window_start(Utc::now(), window_days))
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.0))
}

pub async fn get_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Ban>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Ban>(
        r#"
        SELECT * FROM bans
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
