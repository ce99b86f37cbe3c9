use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub submission_id: i64,
    pub judge_id: i64,
    pub judge_name: String,
    pub rating: i64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}
