use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    /// Discord user id, kept as text
    pub platform_id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub confirmed: bool,
    pub blocked_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if a restriction is still running on `today`.
    /// `blocked_until` is the first free day, rounded up from the real ban end.
    pub fn is_blocked(&self, today: NaiveDate) -> bool {
        self.blocked_until.is_some_and(|until| until > today)
    }

    /// Name to show in notices: `@username`, then display name, then a placeholder
    pub fn label(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("@{}", username);
        }
        self.display_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown user".to_string())
    }
}
