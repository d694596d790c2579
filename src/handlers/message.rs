use std::sync::Arc;

use chrono::Utc;
use serenity::all::{Context, Message};
use tracing::{debug, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::db::queries::user;
use crate::services::gate::confirmation;
use crate::services::moderation::{notices, restriction, strike_service};
use crate::utils::formatting::mention_user;

/// Whether `content` starts with the prefix followed by one of the known command names
pub fn is_command_invocation<'a>(
    content: &str,
    prefix: &str,
    mut command_names: impl Iterator<Item = &'a str>,
) -> bool {
    let Some(rest) = content.strip_prefix(prefix) else {
        return false;
    };
    let Some(word) = rest.split_whitespace().next() else {
        return false;
    };

    command_names.any(|name| name.eq_ignore_ascii_case(word))
}

/// Gate, restriction and profanity handling for every ordinary guild message
pub async fn handle_message(
    ctx: &Context,
    data: &Arc<Data>,
    message: &Message,
) -> Result<(), Error> {
    if message.author.bot {
        return Ok(());
    }
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };

    match serde_json::to_string(message) {
        Ok(json) => debug!("Incoming message: {}", json),
        Err(e) => debug!("Could not serialize message {}: {:?}", message.id, e),
    }

    let author = &message.author;
    let known = user::get_or_create(
        &data.pool,
        &author.id.to_string(),
        Some(author.global_name.as_deref().unwrap_or(&author.name)),
        Some(&author.name),
    )
    .await?;

    // A blocked member can only post once the Discord timeout slice has run out
    if known.is_blocked(Utc::now().date_naive()) {
        info!(
            "Blocked user {} posted, removing message and renewing timeout",
            author.id
        );
        if let Err(e) = message.delete(ctx).await {
            warn!("Could not delete message from blocked user {}: {:?}", author.id, e);
        }
        restriction::renew_if_blocked(ctx, guild_id, author.id, &known).await?;
        return Ok(());
    }

    if !known.confirmed {
        if let Err(e) = confirmation::prompt_unconfirmed(ctx, data, message).await {
            warn!("Could not prompt user {} for confirmation: {:?}", author.id, e);
        }
    }

    let content = Some(message.content.as_str()).filter(|c| !c.is_empty());

    if let Err(found) = data.filter.check(content) {
        if data.settings.is_moderator(author.id.get()) {
            return Ok(());
        }

        info!("User {} tripped the profanity filter: {}", author.id, found);

        let channel = notices::notice_channel(&data.settings, message.channel_id);
        notices::send(ctx, channel, notices::no_swearing(&mention_user(author.id))).await?;
        message.delete(ctx).await?;

        strike_service::issue_strike(ctx, data, guild_id, message.channel_id, author, content)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: [&str; 5] = ["start", "help", "strike", "ban", "warn"];

    #[test]
    fn test_command_detection() {
        assert!(is_command_invocation("!strike", "!", COMMANDS.into_iter()));
        assert!(is_command_invocation("!ban 7", "!", COMMANDS.into_iter()));
        assert!(is_command_invocation("!HELP", "!", COMMANDS.into_iter()));
    }

    #[test]
    fn test_plain_messages_are_not_commands() {
        assert!(!is_command_invocation("hello", "!", COMMANDS.into_iter()));
        assert!(!is_command_invocation("!", "!", COMMANDS.into_iter()));
        assert!(!is_command_invocation("!bananas", "!", COMMANDS.into_iter()));
        assert!(!is_command_invocation("strike", "!", COMMANDS.into_iter()));
    }
}
