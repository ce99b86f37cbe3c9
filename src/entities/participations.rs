use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Participation {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub team_name: String,
    pub joined_at: DateTime<Utc>,
}
