use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Round {
    pub name: String,
    pub description: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub host_id: i64,
    pub name: String,
    pub description: String,
    pub eligibility: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i64,
    pub status: String,
    pub rounds: Json<Vec<Round>>,
    pub judging_criteria: String,
    pub prizes: String,
    pub participant_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct CreateEventArgs<'a> {
    pub host_id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub eligibility: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i64,
    pub rounds: &'a [Round],
    pub judging_criteria: &'a str,
    pub prizes: &'a str,
}

pub struct UpdateEventArgs<'a> {
    pub description: &'a str,
    pub eligibility: &'a str,
    pub rounds: &'a [Round],
    pub judging_criteria: &'a str,
    pub prizes: &'a str,
}
