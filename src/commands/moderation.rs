use std::num::IntErrorKind;

use poise::serenity_prelude::{GuildId, Message};
use tracing::{debug, info, warn};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::moderation::{BAN_CEILING_DAYS, MANUAL_BAN_DEFAULT_DAYS, MANUAL_BAN_MIN_DAYS};
use crate::db::queries::user;
use crate::services::moderation::{notices, restriction, strike_service};
use crate::utils::formatting::{mention_user, truncate};

/// The moderator's command message and the message it replies to
struct ReplyTarget<'a> {
    guild_id: GuildId,
    command: &'a Message,
    target: &'a Message,
}

/// Days for a manual ban, read from the first word of the arguments.
/// Missing or unreadable means the default; the result is kept between the minimum and the ceiling.
pub fn parse_ban_days(args: Option<&str>) -> u32 {
    let Some(first) = args.and_then(|a| a.split_whitespace().next()) else {
        return MANUAL_BAN_DEFAULT_DAYS;
    };

    match first.parse::<i64>() {
        Ok(days) if days < i64::from(MANUAL_BAN_MIN_DAYS) => MANUAL_BAN_MIN_DAYS,
        Ok(days) if days > i64::from(BAN_CEILING_DAYS) => BAN_CEILING_DAYS,
        // MIN..=CEILING fits in u32
        Ok(days) => days as u32,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => BAN_CEILING_DAYS,
            IntErrorKind::NegOverflow => MANUAL_BAN_MIN_DAYS,
            _ => MANUAL_BAN_DEFAULT_DAYS,
        },
    }
}

/// Delete the command message and resolve the reply target.
/// Returns `None` (silently) unless a moderator replied to a non-moderator.
async fn reply_target<'a>(ctx: Context<'a>) -> Option<ReplyTarget<'a>> {
    let poise::Context::Prefix(prefix_ctx) = ctx else {
        return None;
    };
    let command = prefix_ctx.msg;
    let guild_id = command.guild_id?;

    if let Err(e) = command.delete(ctx.serenity_context()).await {
        debug!("Could not delete command message {}: {:?}", command.id, e);
    }

    let settings = &ctx.data().settings;
    if !settings.is_moderator(command.author.id.get()) {
        return None;
    }

    let target = command.referenced_message.as_deref()?;
    if target.author.bot || settings.is_moderator(target.author.id.get()) {
        return None;
    }

    Some(ReplyTarget {
        guild_id,
        command,
        target,
    })
}

fn message_text(message: &Message) -> Option<&str> {
    Some(message.content.as_str()).filter(|c| !c.is_empty())
}

/// Strike the author of the replied-to message and remove that message
#[poise::command(prefix_command, guild_only)]
pub async fn strike(
    ctx: Context<'_>,
    #[rest]
    #[description = "Reason (ignored)"]
    _reason: Option<String>,
) -> Result<(), Error> {
    let Some(ReplyTarget {
        guild_id,
        command,
        target,
    }) = reply_target(ctx).await
    else {
        return Ok(());
    };

    info!(
        "Moderator {} strikes user {}",
        command.author.id, target.author.id
    );

    if let Err(e) = target.delete(ctx.serenity_context()).await {
        warn!("Could not delete struck message {}: {:?}", target.id, e);
    }

    strike_service::issue_strike(
        ctx.serenity_context(),
        ctx.data(),
        guild_id,
        command.channel_id,
        &target.author,
        message_text(target),
    )
    .await?;

    Ok(())
}

/// Block the author of the replied-to message for a number of days (default 365)
#[poise::command(prefix_command, guild_only)]
pub async fn ban(
    ctx: Context<'_>,
    #[rest]
    #[description = "Days to block, then an optional reason"]
    args: Option<String>,
) -> Result<(), Error> {
    let Some(ReplyTarget {
        guild_id,
        command,
        target,
    }) = reply_target(ctx).await
    else {
        return Ok(());
    };

    let days = parse_ban_days(args.as_deref());

    if let Err(e) = target.delete(ctx.serenity_context()).await {
        warn!("Could not delete message {} before ban: {:?}", target.id, e);
    }

    let offender = &target.author;
    let platform_id = offender.id.to_string();
    user::get_or_create(
        &ctx.data().pool,
        &platform_id,
        Some(offender.global_name.as_deref().unwrap_or(&offender.name)),
        Some(&offender.name),
    )
    .await?;

    let reason = format!(
        "MANUAL BLOCK BY {}\n\n{}",
        command.author.id,
        message_text(target).unwrap_or_default()
    );

    let Some(issued) =
        strike_service::record_manual_ban(&ctx.data().pool, &platform_id, &reason, days).await?
    else {
        warn!("User {} vanished before the ban was recorded", offender.id);
        return Ok(());
    };

    info!(
        "Moderator {} banned user {} for {} days: {}",
        command.author.id,
        offender.id,
        days,
        truncate(&reason, 200)
    );

    restriction::restrict_member(ctx.serenity_context(), guild_id, offender.id, issued.until)
        .await?;

    let channel = notices::notice_channel(&ctx.data().settings, command.channel_id);
    notices::send(
        ctx.serenity_context(),
        channel,
        notices::manual_ban(&mention_user(offender.id), days),
    )
    .await?;

    Ok(())
}

/// Remind the author of the replied-to message about the rules. Nothing is recorded.
#[poise::command(prefix_command, guild_only)]
pub async fn warn(
    ctx: Context<'_>,
    #[rest]
    #[description = "Reason (ignored)"]
    _reason: Option<String>,
) -> Result<(), Error> {
    let Some(ReplyTarget {
        command, target, ..
    }) = reply_target(ctx).await
    else {
        return Ok(());
    };

    notices::send(
        ctx.serenity_context(),
        command.channel_id,
        notices::rules_reminder(&mention_user(target.author.id)),
    )
    .await?;

    Ok(())
}
