use crate::entities::sessions::Session as SessionEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller. Every usecase that acts on behalf of a user takes one.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<SessionEntity> for Session {
    fn from(value: SessionEntity) -> Self {
        Self {
            session_id: value.session_id,
            user_id: value.user_id,
            name: value.name,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}
