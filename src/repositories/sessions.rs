use crate::common::context::Context;
use crate::entities::sessions::Session;
use chrono::Utc;
use uuid::Uuid;

const READ_FIELDS: &str = const_str::concat!(
    "s.session_id, s.user_id, u.name, u.email, s.created_at ",
    "FROM sessions s INNER JOIN users u ON u.id = s.user_id"
);

pub async fn create<C: Context>(ctx: &C, user_id: i64) -> sqlx::Result<Session> {
    const QUERY: &str = "INSERT INTO sessions (session_id, user_id, created_at) VALUES (?, ?, ?)";
    let session_id = Uuid::new_v4();
    sqlx::query(QUERY)
        .bind(session_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(ctx.db())
        .await?;
    fetch_one(ctx, session_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn fetch_one<C: Context>(ctx: &C, session_id: Uuid) -> sqlx::Result<Option<Session>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE s.session_id = ?");
    sqlx::query_as(QUERY)
        .bind(session_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn delete<C: Context>(ctx: &C, session_id: Uuid) -> sqlx::Result<bool> {
    const QUERY: &str = "DELETE FROM sessions WHERE session_id = ?";
    let result = sqlx::query(QUERY)
        .bind(session_id)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() > 0)
}
