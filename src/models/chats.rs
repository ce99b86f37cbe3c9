use crate::common::error::{AppError, unexpected};
use crate::entities::chats::Chat as ChatEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Event,
    Direct,
}

impl ChatType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChatType::Event => "event",
            ChatType::Direct => "direct",
        }
    }
}

impl TryFrom<&str> for ChatType {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "event" => Ok(ChatType::Event),
            "direct" => Ok(ChatType::Direct),
            _ => unexpected(anyhow::anyhow!("invalid chat type: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub chat_id: i64,
    pub chat_type: ChatType,
    pub event_id: Option<i64>,
    pub event_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ChatEntity> for Chat {
    type Error = AppError;

    fn try_from(value: ChatEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            chat_type: ChatType::try_from(value.chat_type.as_str())?,
            chat_id: value.id,
            event_id: value.event_id,
            event_name: value.event_name,
            created_at: value.created_at,
        })
    }
}

/// Identifies the direct chat of a user pair regardless of who opened it.
pub fn direct_key(user_id: i64, other_user_id: i64) -> String {
    let (low, high) = match user_id <= other_user_id {
        true => (user_id, other_user_id),
        false => (other_user_id, user_id),
    };
    format!("{low}:{high}")
}

#[derive(Debug, Deserialize)]
pub struct OpenDirectArgs {
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_key_ignores_pair_order() {
        assert_eq!(direct_key(3, 9), "3:9");
        assert_eq!(direct_key(9, 3), "3:9");
    }
}
