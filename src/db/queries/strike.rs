use chrono::Utc;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::Strike;
use crate::db::window::window_start;

pub async fn create<'e, E>(
    executor: E,
    user_id: Uuid,
    message: Option<&str>,
) -> Result<Strike, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Strike>(
        r#"
        INSERT INTO strikes (user_id, message)
        VALUES ($1, $2)
        RETURNING *
        "#
    )
    .bind(user_id)
    .bind(message)
    .fetch_one(executor)
    .await
}

/// Count a user's strikes from the last `window_days`.
/// `None` means there is no such user, as opposed to `Some(0)`.
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
            SELECT COUNT(*) FROM strikes s
            WHERE s.user_id = u.id AND s.created_at >= $2
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

pub async fn get_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Strike>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Strike>(
        r#"
        SELECT * FROM strikes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
