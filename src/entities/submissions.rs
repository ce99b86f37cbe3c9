use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Submission {
    pub id: i64,
    pub participation_id: i64,
    pub event_id: i64,
    pub team_name: String,
    pub github_link: String,
    pub demo_link: Option<String>,
    pub file_url: Option<String>,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
}

pub struct CreateSubmissionArgs<'a> {
    pub participation_id: i64,
    pub github_link: &'a str,
    pub demo_link: Option<&'a str>,
    pub file_url: Option<&'a str>,
    pub description: &'a str,
}
