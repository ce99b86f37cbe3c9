use crate::common::error::{AppError, ServiceResult};
use crate::entities::messages::Message as MessageEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_MESSAGE_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for Message {
    fn from(value: MessageEntity) -> Self {
        Self {
            message_id: value.id,
            chat_id: value.chat_id,
            sender_id: value.sender_id,
            sender_name: value.sender_name,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Checks the content as it will be stored, that is trimmed.
pub fn validate_content(content: &str) -> ServiceResult<()> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::MessagesEmpty);
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::MessagesTooLong);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PostMessageArgs {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_measured_after_trimming() {
        let padded = format!("  {}\n", "a".repeat(MAX_MESSAGE_LENGTH));
        assert_eq!(validate_content(&padded), Ok(()));

        let too_long = format!(" {} ", "é".repeat(MAX_MESSAGE_LENGTH + 1));
        assert_eq!(validate_content(&too_long), Err(AppError::MessagesTooLong));
        assert_eq!(validate_content(" \t\n"), Err(AppError::MessagesEmpty));
    }
}
