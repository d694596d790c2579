use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::window;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Strike {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Snapshot of the offending message
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Strike {
    /// Check if the strike still counts toward the limit
    pub fn is_active(&self, now: DateTime<Utc>, window_days: u32) -> bool {
        window::in_window(self.created_at, now, window_days)
    }
}
