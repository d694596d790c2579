use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::window;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Ban {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason: Option<String>,
    /// Length in days
    pub period: i32,
    pub created_at: DateTime<Utc>,
}

impl Ban {
    /// Check if the ban still counts toward the escalation tier
    pub fn is_active(&self, now: DateTime<Utc>, window_days: u32) -> bool {
        window::in_window(self.created_at, now, window_days)
    }
}
