use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
    pub event_id: Option<i64>,
    pub event_name: Option<String>,
    pub direct_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
