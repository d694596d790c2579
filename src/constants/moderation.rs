/// Strikes inside the window before a ban is issued
pub const DEFAULT_STRIKE_LIMIT: u32 = 3;

/// Rolling window for counting strikes
pub const DEFAULT_STRIKE_WINDOW_DAYS: u32 = 30;

/// Rolling window for counting previous bans when picking a tier
pub const BAN_WINDOW_DAYS: u32 = 365;

/// Escalation table: bans in the last year -> ban length in days
pub const DEFAULT_BAN_TIERS: &[(u32, u32)] = &[(0, 7), (1, 30), (2, 180), (3, 365)];

/// Ban length for any ban count missing from the table
pub const MAX_BAN_DAYS: u32 = 365;

/// Manual ban length when the moderator gives no usable number
pub const MANUAL_BAN_DEFAULT_DAYS: u32 = 365;

/// Shortest manual ban
pub const MANUAL_BAN_MIN_DAYS: u32 = 1;

/// Longest ban of any kind (100 years); larger requests are clamped to this
pub const BAN_CEILING_DAYS: u32 = 36_500;

/// Discord refuses member timeouts longer than this
pub const MAX_TIMEOUT_DAYS: i64 = 28;

/// How long an unconfirmed member's message survives before cleanup
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECONDS: u64 = 30;

/// Prefix for reply-style moderator commands
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Custom id prefix for the confirmation button
pub const CONFIRM_BUTTON_PREFIX: &str = "confirm_";
