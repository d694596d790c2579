use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serenity::all::{CacheHttp, EditMember, GuildId, UserId};
use tracing::{debug, error};

use crate::bot::error::Error;
use crate::constants::moderation::{BAN_CEILING_DAYS, MAX_TIMEOUT_DAYS};
use crate::db::models::User;

/// End of a ban that starts at `now` and lasts `days` (at most the ban ceiling)
pub fn ban_end(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let days = days.min(BAN_CEILING_DAYS);
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Discord caps timeouts, so long bans are applied in slices and renewed later
pub fn timeout_end(now: DateTime<Utc>, until: DateTime<Utc>) -> DateTime<Utc> {
    until.min(now + Duration::days(MAX_TIMEOUT_DAYS))
}

/// Date stored in `blocked_until`: the first whole day the member is free again.
/// A ban that ends mid-day keeps the member blocked until the next midnight.
pub fn blocked_until_date(until: DateTime<Utc>) -> NaiveDate {
    let date = until.date_naive();
    if until.time() == NaiveTime::default() {
        date
    } else {
        date.succ_opt().unwrap_or(date)
    }
}

/// Start of the day a stored restriction ends
pub fn blocked_until_instant(until: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&until.and_time(NaiveTime::default()))
}

/// Time a member out until `until` (or the longest timeout Discord allows)
pub async fn restrict_member(
    http: impl CacheHttp,
    guild_id: GuildId,
    user_id: UserId,
    until: DateTime<Utc>,
) -> Result<(), Error> {
    let end = timeout_end(Utc::now(), until);
    let edit = EditMember::new().disable_communication_until(end.to_rfc3339());

    match guild_id.edit_member(&http, user_id, edit).await {
        Ok(_) => {
            debug!(
                "Timed out user {} in guild {} until {}",
                user_id, guild_id, end
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to time out user {}: {:?}", user_id, e);
            Err(Error::Serenity(e))
        }
    }
}

/// Re-apply the timeout for a member whose stored restriction is still running.
/// Returns true if the member is blocked.
pub async fn renew_if_blocked(
    http: impl CacheHttp,
    guild_id: GuildId,
    user_id: UserId,
    user: &User,
) -> Result<bool, Error> {
    let now = Utc::now();
    let Some(until) = user.blocked_until.filter(|_| user.is_blocked(now.date_naive())) else {
        return Ok(false);
    };

    restrict_member(http, guild_id, user_id, blocked_until_instant(until)).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_ban_is_not_capped() {
        let now = Utc::now();
        let until = ban_end(now, 7);
        assert_eq!(timeout_end(now, until), until);
    }

    #[test]
    fn test_ban_end_is_clamped() {
        let now = Utc::now();
        let ceiling = now + Duration::days(i64::from(BAN_CEILING_DAYS));
        assert_eq!(ban_end(now, u32::MAX), ceiling);
        assert_eq!(ban_end(now, BAN_CEILING_DAYS + 1), ceiling);
    }

    #[test]
    fn test_long_ban_is_capped() {
        let now = Utc::now();
        let until = ban_end(now, 365);
        assert_eq!(timeout_end(now, until), now + Duration::days(28));
    }

    #[test]
    fn test_blocked_until_date_rounds_up() {
        let mid_day = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let feb_first = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let jan_last = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        assert_eq!(blocked_until_date(mid_day), feb_first);
        assert_eq!(blocked_until_date(midnight), jan_last);
    }

    #[test]
    fn test_member_blocked_through_last_day() {
        let now = Utc.with_ymd_and_hms(2025, 1, 24, 10, 0, 0).unwrap();
        let until = ban_end(now, 7);
        let member = User {
            id: uuid::Uuid::nil(),
            platform_id: "1".to_string(),
            display_name: None,
            username: None,
            confirmed: true,
            blocked_until: Some(blocked_until_date(until)),
            created_at: now,
            updated_at: now,
        };

        let last_day = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert!(member.is_blocked(last_day));
        assert!(!member.is_blocked(last_day.succ_opt().unwrap()));
    }

    #[test]
    fn test_blocked_until_instant_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            blocked_until_instant(date).to_rfc3339(),
            "2025-01-31T00:00:00+00:00"
        );
    }
}
