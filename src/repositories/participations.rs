use crate::common::context::Context;
use crate::entities::participations::Participation;
use chrono::Utc;
use sqlx::SqliteConnection;

const TABLE_NAME: &str = "participations";
const READ_FIELDS: &str = "id, event_id, user_id, team_name, joined_at";

/// Inserts the participation only if the event is not completed and still has room.
/// The capacity check and the insert are one statement, so concurrent joins cannot
/// overshoot `max_participants`. Returns `None` if the gate rejected the insert.
pub async fn create(
    conn: &mut SqliteConnection,
    event_id: i64,
    user_id: i64,
    team_name: &str,
) -> sqlx::Result<Option<Participation>> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (event_id, user_id, team_name, joined_at) ",
        "SELECT e.id, ?, ?, ? FROM events e WHERE e.id = ? AND e.status <> 'completed' ",
        "AND (SELECT COUNT(*) FROM participations p WHERE p.event_id = e.id) < e.max_participants ",
        "RETURNING ",
        READ_FIELDS
    );
    sqlx::query_as(QUERY)
        .bind(user_id)
        .bind(team_name)
        .bind(Utc::now())
        .bind(event_id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_one<C: Context>(
    ctx: &C,
    participation_id: i64,
) -> sqlx::Result<Option<Participation>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(participation_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_one_by_event_and_user<C: Context>(
    ctx: &C,
    event_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<Participation>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE event_id = ? AND user_id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_by_user<C: Context>(ctx: &C, user_id: i64) -> sqlx::Result<Vec<Participation>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE user_id = ? ORDER BY joined_at DESC, id DESC"
    );
    sqlx::query_as(QUERY)
        .bind(user_id)
        .fetch_all(ctx.db())
        .await
}

pub async fn count_by_user<C: Context>(ctx: &C, user_id: i64) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!("SELECT COUNT(*) FROM ", TABLE_NAME, " WHERE user_id = ?");
    sqlx::query_scalar(QUERY)
        .bind(user_id)
        .fetch_one(ctx.db())
        .await
}
