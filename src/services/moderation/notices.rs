use serenity::all::{CacheHttp, ChannelId, CreateEmbed, CreateMessage};

use crate::bot::error::Error;
use crate::config::Settings;
use crate::constants::embeds;
use crate::utils::formatting::format_days;

/// Moderation notices go to the moderator channel when one is configured
pub fn notice_channel(settings: &Settings, source: ChannelId) -> ChannelId {
    settings
        .moderator_channel_id
        .map(ChannelId::new)
        .unwrap_or(source)
}

pub async fn send(http: impl CacheHttp, channel_id: ChannelId, embed: CreateEmbed) -> Result<(), Error> {
    channel_id
        .send_message(http, CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}

pub fn strike_warning_text(mention: &str, remaining: u32) -> String {
    format!(
        "{}, you broke the community rules and received a strike.\n\n\
        {} more and you will be banned!",
        mention, remaining
    )
}

pub fn strike_ban_text(mention: &str, days: u32) -> String {
    format!(
        "{}, you broke the community rules and received a strike.\n\n\
        Strike limit exceeded, access to the community is blocked for {}.",
        mention,
        format_days(days)
    )
}

pub fn manual_ban_text(mention: &str, days: u32) -> String {
    format!("User {} is blocked for {}.", mention, format_days(days))
}

pub fn no_swearing_text(mention: &str) -> String {
    format!("{}, no swearing here!", mention)
}

pub fn rules_reminder_text(mention: &str) -> String {
    format!(
        "{}, just a friendly reminder that the community rules apply to everyone!\n\n\
        You can read them in the rules channel.",
        mention
    )
}

pub fn strike_warning(mention: &str, remaining: u32) -> CreateEmbed {
    embeds::warning_embed()
        .title("Strike")
        .description(strike_warning_text(mention, remaining))
}

pub fn strike_ban(mention: &str, days: u32) -> CreateEmbed {
    embeds::error_embed()
        .title("Strike Limit Exceeded")
        .description(strike_ban_text(mention, days))
}

pub fn manual_ban(mention: &str, days: u32) -> CreateEmbed {
    embeds::error_embed()
        .title("User Blocked")
        .description(manual_ban_text(mention, days))
}

pub fn no_swearing(mention: &str) -> CreateEmbed {
    embeds::warning_embed().description(no_swearing_text(mention))
}

pub fn rules_reminder(mention: &str) -> CreateEmbed {
    embeds::info_embed()
        .title("Rules Reminder")
        .description(rules_reminder_text(mention))
}
