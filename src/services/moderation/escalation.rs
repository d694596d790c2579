use std::collections::BTreeMap;

use crate::constants::moderation::{
    BAN_CEILING_DAYS, BAN_WINDOW_DAYS, DEFAULT_BAN_TIERS, DEFAULT_STRIKE_LIMIT, DEFAULT_STRIKE_WINDOW_DAYS,
    MAX_BAN_DAYS,
};

/// Outcome of a fresh strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Below the limit; `remaining` more strikes trigger a ban
    Warn { remaining: u32 },
    /// Limit reached
    Ban,
}

/// Decide between a warning and a ban for the current strike count
pub fn decide(strike_count: i64, limit: u32) -> Verdict {
    if strike_count < i64::from(limit) {
        // count < limit <= u32::MAX, so the difference fits
        let remaining = (i64::from(limit) - strike_count.max(0)) as u32;
        Verdict::Warn { remaining }
    } else {
        Verdict::Ban
    }
}

/// Ban length table keyed by the number of bans in the trailing year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanTiers(BTreeMap<u32, u32>);

impl BanTiers {
    pub fn new(tiers: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self(tiers.into_iter().collect())
    }

    /// Parse a `count:days` list such as `0:7,1:30,2:180,3:365`
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut tiers = BTreeMap::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (count, days) = entry
                .split_once(':')
                .ok_or_else(|| format!("Ban tier '{}' is not in count:days form", entry))?;

            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| format!("Invalid ban count in tier '{}'", entry))?;
            let days: u32 = days
                .trim()
                .parse()
                .map_err(|_| format!("Invalid ban length in tier '{}'", entry))?;

            if days == 0 {
                return Err(format!("Ban tier '{}' must last at least one day", entry));
            }
            if days > BAN_CEILING_DAYS {
                return Err(format!(
                    "Ban tier '{}' is longer than {} days",
                    entry, BAN_CEILING_DAYS
                ));
            }

            tiers.insert(count, days);
        }

        if tiers.is_empty() {
            return Err("Ban tier table is empty".to_string());
        }

        Ok(Self(tiers))
    }

    /// Ban length for a user with `prior_bans` bans in the trailing window.
    /// Counts absent from the table get the maximum length.
    pub fn duration(&self, prior_bans: i64) -> u32 {
        u32::try_from(prior_bans)
            .ok()
            .and_then(|count| self.0.get(&count).copied())
            .unwrap_or(MAX_BAN_DAYS)
    }
}

impl Default for BanTiers {
    fn default() -> Self {
        Self::new(DEFAULT_BAN_TIERS.iter().copied())
    }
}

/// Strike limits and ban escalation, fixed at startup
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    pub strike_limit: u32,
    pub strike_window_days: u32,
    pub ban_window_days: u32,
    pub ban_tiers: BanTiers,
}

impl EscalationPolicy {
    pub fn decide(&self, strike_count: i64) -> Verdict {
        decide(strike_count, self.strike_limit)
    }

    pub fn ban_duration(&self, prior_bans: i64) -> u32 {
        self.ban_tiers.duration(prior_bans)
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            strike_limit: DEFAULT_STRIKE_LIMIT,
            strike_window_days: DEFAULT_STRIKE_WINDOW_DAYS,
            ban_window_days: BAN_WINDOW_DAYS,
            ban_tiers: BanTiers::default(),
        }
    }
}
