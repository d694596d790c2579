use chrono::{DateTime, Duration, Utc};

/// Earliest `created_at` still inside a rolling window of `days` ending at `now`.
/// The boundary itself is inside the window.
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// Whether an event at `at` falls inside the window ending at `now`
pub fn in_window(at: DateTime<Utc>, now: DateTime<Utc>, days: u32) -> bool {
    at >= window_start(now, days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_boundary_is_inclusive() {
        let now = Utc::now();
        let edge = now - Duration::days(30);

        assert!(in_window(edge, now, 30));
        assert!(in_window(now, now, 30));
        assert!(!in_window(edge - Duration::milliseconds(1), now, 30));
    }

    #[test]
    fn test_zero_day_window() {
        let now = Utc::now();
        assert!(in_window(now, now, 0));
        assert!(!in_window(now - Duration::seconds(1), now, 0));
    }
}
