use serenity::all::UserId;

/// Format a user mention
pub fn mention_user(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Pluralize "day" for notices
pub fn format_days(days: u32) -> String {
    format!("{} day{}", days, if days == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention() {
        assert_eq!(mention_user(UserId::new(42)), "<@42>");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 8), "a lon...");
        assert_eq!(truncate("привет мир", 5), "пр...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(1), "1 day");
        assert_eq!(format_days(30), "30 days");
    }
}
