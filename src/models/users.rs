use crate::entities::users::User as UserEntity;
use crate::models::capabilities::EventCapabilities;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub roles: EventCapabilities,
    pub events_participated: i64,
    pub events_hosted: i64,
    pub events_judged: i64,
}

impl From<UserEntity> for User {
    fn from(value: UserEntity) -> Self {
        Self {
            user_id: value.id,
            email: value.email,
            name: value.name,
            created_at: value.created_at,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized_before_comparison() {
        assert_eq!(normalize_email("  Judge@Example.COM "), "judge@example.com");
        assert!(is_valid_email("judge@example.com"));
        assert!(!is_valid_email("judge.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c"));
    }
}
