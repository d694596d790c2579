use std::env;

use crate::constants::moderation::{
    BAN_WINDOW_DAYS, DEFAULT_COMMAND_PREFIX, DEFAULT_CONFIRMATION_TIMEOUT_SECONDS,
    DEFAULT_STRIKE_LIMIT, DEFAULT_STRIKE_WINDOW_DAYS,
};
use crate::services::moderation::escalation::{BanTiers, EscalationPolicy};

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub database_url: String,
    pub guild_id: Option<u64>,
    /// Users allowed to strike, ban and warn
    pub moderator_ids: Vec<u64>,
    /// Channel or thread receiving moderation notices
    pub moderator_channel_id: Option<u64>,
    pub command_prefix: String,
    pub escalation: EscalationPolicy,
    /// Profanity roots, matched with any word ending
    pub obscene_roots: Vec<String>,
    /// Profanity words, matched whole
    pub full_word_patterns: Vec<String>,
    /// Delay before an unconfirmed member's message is cleaned up
    pub confirmation_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable not set")?;

        let guild_id = env::var("GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let moderator_ids = parse_id_list(&env::var("MODERATOR_IDS").unwrap_or_default())?;

        let moderator_channel_id = env::var("MODERATOR_CHANNEL_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let command_prefix = env::var("COMMAND_PREFIX")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        let strike_limit = env::var("STRIKES_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|limit: &u32| *limit > 0)
            .unwrap_or(DEFAULT_STRIKE_LIMIT);

        let strike_window_days = env::var("STRIKE_WINDOW_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_STRIKE_WINDOW_DAYS);

        let ban_tiers = match env::var("BAN_LIMITS") {
            Ok(raw) if !raw.trim().is_empty() => BanTiers::parse(&raw)?,
            _ => BanTiers::default(),
        };

        let obscene_roots = parse_list(&env::var("OBSCENE_ROOTS").unwrap_or_default());
        let full_word_patterns = parse_list(&env::var("FULL_WORD_PATTERNS").unwrap_or_default());

        let confirmation_timeout_seconds = env::var("CONFIRMATION_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT_SECONDS);

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
            moderator_ids,
            moderator_channel_id,
            command_prefix,
            escalation: EscalationPolicy {
                strike_limit,
                strike_window_days,
                ban_window_days: BAN_WINDOW_DAYS,
                ban_tiers,
            },
            obscene_roots,
            full_word_patterns,
            confirmation_timeout_seconds,
        })
    }

    pub fn is_moderator(&self, user_id: u64) -> bool {
        self.moderator_ids.contains(&user_id)
    }
}

/// Split a comma-separated list, dropping blanks
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_id_list(raw: &str) -> Result<Vec<u64>, String> {
    parse_list(raw)
        .into_iter()
        .map(|id| {
            id.parse::<u64>()
                .map_err(|_| format!("Invalid user id '{}' in MODERATOR_IDS", id))
        })
        .collect()
}
