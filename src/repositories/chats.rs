use crate::common::context::Context;
use crate::entities::chats::Chat;
use chrono::Utc;
use sqlx::SqliteConnection;

const READ_FIELDS: &str = const_str::concat!(
    "c.id, c.chat_type, c.event_id, e.name AS event_name, c.direct_key, c.created_at ",
    "FROM chats c LEFT JOIN events e ON e.id = c.event_id"
);

pub async fn create_event_chat(conn: &mut SqliteConnection, event_id: i64) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO chats (chat_type, event_id, created_at) ",
        "VALUES ('event', ?, ?) RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(event_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
}

pub async fn create_direct_chat(
    conn: &mut SqliteConnection,
    direct_key: &str,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO chats (chat_type, direct_key, created_at) ",
        "VALUES ('direct', ?, ?) RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(direct_key)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
}

pub async fn fetch_one<C: Context>(ctx: &C, chat_id: i64) -> sqlx::Result<Option<Chat>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE c.id = ?");
    sqlx::query_as(QUERY)
        .bind(chat_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_one_by_event<C: Context>(ctx: &C, event_id: i64) -> sqlx::Result<Option<Chat>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE c.event_id = ?");
    sqlx::query_as(QUERY)
        .bind(event_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_one_by_direct_key<C: Context>(
    ctx: &C,
    direct_key: &str,
) -> sqlx::Result<Option<Chat>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE c.direct_key = ?");
    sqlx::query_as(QUERY)
        .bind(direct_key)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_by_member<C: Context>(ctx: &C, user_id: i64) -> sqlx::Result<Vec<Chat>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " INNER JOIN chat_members m ON m.chat_id = c.id ",
        "WHERE m.user_id = ? ORDER BY c.created_at DESC, c.id DESC"
    );
    sqlx::query_as(QUERY)
        .bind(user_id)
        .fetch_all(ctx.db())
        .await
}

pub async fn add_member(
    conn: &mut SqliteConnection,
    chat_id: i64,
    user_id: i64,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "INSERT OR IGNORE INTO chat_members (chat_id, user_id, joined_at) ",
        "VALUES (?, ?, ?)"
    );
    sqlx::query(QUERY)
        .bind(chat_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn is_member<C: Context>(ctx: &C, chat_id: i64, user_id: i64) -> sqlx::Result<bool> {
    const QUERY: &str =
        "SELECT EXISTS (SELECT 1 FROM chat_members WHERE chat_id = ? AND user_id = ?)";
    sqlx::query_scalar(QUERY)
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(ctx.db())
        .await
}
