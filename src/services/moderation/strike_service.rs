use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, Context, GuildId, User as DiscordUser};
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::db::models::{Ban, User};
use crate::db::queries::{ban, strike, user};
use crate::services::moderation::escalation::{EscalationPolicy, Verdict};
use crate::services::moderation::{notices, restriction};
use crate::utils::formatting::mention_user;

/// A ban written to the ledger
#[derive(Debug, Clone)]
pub struct IssuedBan {
    pub record: Ban,
    pub days: u32,
    pub until: DateTime<Utc>,
}

/// Result of recording one strike
#[derive(Debug, Clone)]
pub struct StrikeOutcome {
    pub user: User,
    /// Strikes inside the window, including this one
    pub strike_count: i64,
    pub verdict: Verdict,
    pub ban: Option<IssuedBan>,
}

/// Record a strike and apply the escalation policy in one transaction.
///
/// The user row is locked first, so two strikes for the same member arriving together
/// are counted one after the other instead of both seeing the old total.
/// Returns `None` if the user does not exist.
pub async fn record_strike(
    pool: &PgPool,
    policy: &EscalationPolicy,
    platform_id: &str,
    content: Option<&str>,
) -> Result<Option<StrikeOutcome>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(offender) = user::lock(&mut *tx, platform_id).await? else {
        return Ok(None);
    };

    strike::create(&mut *tx, offender.id, content).await?;

    let Some(strike_count) =
        strike::count_recent(&mut *tx, platform_id, policy.strike_window_days).await?
    else {
        return Ok(None);
    };

    let verdict = policy.decide(strike_count);

    let issued = match verdict {
        Verdict::Warn { .. } => None,
        Verdict::Ban => {
            let Some(prior_bans) =
                ban::count_recent(&mut *tx, platform_id, policy.ban_window_days).await?
            else {
                return Ok(None);
            };
            let days = policy.ban_duration(prior_bans);
            Some(write_ban(&mut *tx, offender.id, content, days).await?)
        }
    };

    tx.commit().await?;

    Ok(Some(StrikeOutcome {
        user: offender,
        strike_count,
        verdict,
        ban: issued,
    }))
}

/// Record a moderator-issued ban. Returns `None` if the user does not exist.
pub async fn record_manual_ban(
    pool: &PgPool,
    platform_id: &str,
    reason: &str,
    days: u32,
) -> Result<Option<IssuedBan>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(target) = user::lock(&mut *tx, platform_id).await? else {
        return Ok(None);
    };

    let issued = write_ban(&mut *tx, target.id, Some(reason), days).await?;
    tx.commit().await?;

    Ok(Some(issued))
}

async fn write_ban(
    conn: &mut PgConnection,
    user_id: Uuid,
    reason: Option<&str>,
    days: u32,
) -> Result<IssuedBan, sqlx::Error> {
    let until = restriction::ban_end(Utc::now(), days);

    let record = ban::create(&mut *conn, user_id, reason, days).await?;
    user::set_blocked_until(&mut *conn, user_id, restriction::blocked_until_date(until)).await?;

    Ok(IssuedBan {
        record,
        days,
        until,
    })
}

/// Register the offender, record the strike, then warn or ban them on Discord
pub async fn issue_strike(
    ctx: &Context,
    data: &Arc<Data>,
    guild_id: GuildId,
    source_channel: ChannelId,
    offender: &DiscordUser,
    content: Option<&str>,
) -> Result<Option<StrikeOutcome>, Error> {
    let platform_id = offender.id.to_string();
    user::get_or_create(
        &data.pool,
        &platform_id,
        Some(offender.global_name.as_deref().unwrap_or(&offender.name)),
        Some(&offender.name),
    )
    .await?;

    let Some(outcome) =
        record_strike(&data.pool, &data.settings.escalation, &platform_id, content).await?
    else {
        warn!("User {} vanished before the strike was recorded", offender.id);
        return Ok(None);
    };

    let mention = mention_user(offender.id);
    let channel = notices::notice_channel(&data.settings, source_channel);

    match (&outcome.verdict, &outcome.ban) {
        (Verdict::Warn { remaining }, _) => {
            info!(
                "Strike {} for user {} ({} left before ban)",
                outcome.strike_count, offender.id, remaining
            );
            notices::send(ctx, channel, notices::strike_warning(&mention, *remaining)).await?;
        }
        (Verdict::Ban, Some(issued)) => {
            info!(
                "Strike {} for user {} exceeds the limit, banning for {} days",
                outcome.strike_count, offender.id, issued.days
            );
            restriction::restrict_member(ctx, guild_id, offender.id, issued.until).await?;
            notices::send(ctx, channel, notices::strike_ban(&mention, issued.days)).await?;
        }
        (Verdict::Ban, None) => {
            warn!("Ban verdict for user {} without a ban record", offender.id);
        }
    }

    Ok(Some(outcome))
}
