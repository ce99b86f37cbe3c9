use crate::common::context::Context;
use crate::entities::messages::Message;
use chrono::{DateTime, Utc};

pub async fn create<C: Context>(
    ctx: &C,
    chat_id: i64,
    sender_id: i64,
    content: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO messages (chat_id, sender_id, content, created_at) ",
        "VALUES (?, ?, ?, ?) RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(chat_id)
        .bind(sender_id)
        .bind(content)
        .bind(created_at)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_history<C: Context>(ctx: &C, chat_id: i64) -> sqlx::Result<Vec<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT m.id, m.chat_id, m.sender_id, u.name AS sender_name, m.content, m.created_at ",
        "FROM messages m INNER JOIN users u ON u.id = m.sender_id ",
        "WHERE m.chat_id = ? ORDER BY m.created_at ASC, m.id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(chat_id)
        .fetch_all(ctx.db())
        .await
}
