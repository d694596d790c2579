//! Ledger and escalation tests against a real Postgres.
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::Utc;
use sqlx::PgPool;
use warden::db::pool::run_migrations;
use warden::db::queries::{ban, strike, user};
use warden::services::moderation::escalation::{EscalationPolicy, Verdict};
use warden::services::moderation::restriction::blocked_until_date;
use warden::services::moderation::strike_service::{record_manual_ban, record_strike};

async fn setup(pool: &PgPool) {
    run_migrations(pool).await.unwrap();
}

async fn backdate_strike(pool: &PgPool, user_id: uuid::Uuid, days_ago: i32) {
    sqlx::query(
        "INSERT INTO strikes (user_id, message, created_at) \
         VALUES ($1, 'old', NOW() - make_interval(days => $2))",
    )
    .bind(user_id)
    .bind(days_ago)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_get_or_create_keeps_first_names(pool: PgPool) {
    setup(&pool).await;

    let first = user::get_or_create(&pool, "100", Some("Alice"), Some("alice"))
        .await
        .unwrap();
    let second = user::get_or_create(&pool, "100", Some("Mallory"), Some("mallory"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.display_name.as_deref(), Some("Alice"));
    assert_eq!(second.username.as_deref(), Some("alice"));
    assert!(!second.confirmed);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_confirm_is_idempotent(pool: PgPool) {
    setup(&pool).await;

    assert!(user::confirm(&pool, "200").await.unwrap().is_none());

    user::get_or_create(&pool, "200", Some("Bob"), None)
        .await
        .unwrap();

    let once = user::confirm(&pool, "200").await.unwrap().unwrap();
    let twice = user::confirm(&pool, "200").await.unwrap().unwrap();

    assert!(once.confirmed);
    assert!(twice.confirmed);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_counts_distinguish_missing_user(pool: PgPool) {
    setup(&pool).await;

    assert_eq!(strike::count_recent(&pool, "300", 30).await.unwrap(), None);
    assert_eq!(ban::count_recent(&pool, "300", 365).await.unwrap(), None);

    user::get_or_create(&pool, "300", None, None).await.unwrap();

    assert_eq!(strike::count_recent(&pool, "300", 30).await.unwrap(), Some(0));
    assert_eq!(ban::count_recent(&pool, "300", 365).await.unwrap(), Some(0));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_strikes_outside_window_are_ignored(pool: PgPool) {
    setup(&pool).await;

    let member = user::get_or_create(&pool, "400", None, None).await.unwrap();
    backdate_strike(&pool, member.id, 45).await;
    backdate_strike(&pool, member.id, 29).await;

    assert_eq!(strike::count_recent(&pool, "400", 30).await.unwrap(), Some(1));
    assert_eq!(strike::count_recent(&pool, "400", 60).await.unwrap(), Some(2));

    let now = Utc::now();
    let active = strike::get_for_user(&pool, member.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.is_active(now, 30))
        .count();
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_first_offence_warns(pool: PgPool) {
    setup(&pool).await;
    user::get_or_create(&pool, "500", Some("Carol"), None)
        .await
        .unwrap();

    let outcome = record_strike(&pool, &EscalationPolicy::default(), "500", Some("bad words"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.strike_count, 1);
    assert_eq!(outcome.verdict, Verdict::Warn { remaining: 2 });
    assert!(outcome.ban.is_none());

    let strikes = strike::get_for_user(&pool, outcome.user.id).await.unwrap();
    assert_eq!(strikes.len(), 1);
    assert_eq!(strikes[0].message.as_deref(), Some("bad words"));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_repeat_offender_gets_second_tier(pool: PgPool) {
    setup(&pool).await;
    let member = user::get_or_create(&pool, "600", None, None).await.unwrap();

    for _ in 0..3 {
        strike::create(&pool, member.id, Some("earlier")).await.unwrap();
    }
    ban::create(&pool, member.id, Some("earlier ban"), 7)
        .await
        .unwrap();

    let outcome = record_strike(&pool, &EscalationPolicy::default(), "600", Some("again"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.strike_count, 4);
    assert_eq!(outcome.verdict, Verdict::Ban);
    let issued = outcome.ban.unwrap();
    assert_eq!(issued.days, 30);
    assert_eq!(issued.record.period, 30);

    let refreshed = user::get(&pool, "600").await.unwrap().unwrap();
    assert_eq!(refreshed.blocked_until, Some(blocked_until_date(issued.until)));
    assert!(refreshed.is_blocked(Utc::now().date_naive()));

    let bans = ban::get_for_user(&pool, member.id).await.unwrap();
    assert_eq!(bans.len(), 2);
    assert!(bans.iter().all(|b| b.is_active(Utc::now(), 365)));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_strike_for_unknown_user(pool: PgPool) {
    setup(&pool).await;

    let outcome = record_strike(&pool, &EscalationPolicy::default(), "700", None)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_manual_ban_and_cascade_delete(pool: PgPool) {
    setup(&pool).await;
    let member = user::get_or_create(&pool, "800", None, None).await.unwrap();
    strike::create(&pool, member.id, None).await.unwrap();

    let issued = record_manual_ban(&pool, "800", "MANUAL BLOCK BY 1\n\nspam", 3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(issued.days, 3);
    assert_eq!(ban::count_recent(&pool, "800", 365).await.unwrap(), Some(1));

    assert!(user::delete(&pool, "800").await.unwrap());
    assert!(!user::delete(&pool, "800").await.unwrap());

    let leftovers: (i64,) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM strikes WHERE user_id = $1) \
              + (SELECT COUNT(*) FROM bans WHERE user_id = $1)",
    )
    .bind(member.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(leftovers.0, 0);
}
