use crate::common::context::Context;
use crate::entities::events::{CreateEventArgs, Event, UpdateEventArgs};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use sqlx::types::Json;

const TABLE_NAME: &str = "events";
const READ_FIELDS: &str = r#"
e.id, e.host_id, e.name, e.description, e.eligibility, e.start_date, e.end_date,
e.max_participants, e.status, e.rounds, e.judging_criteria, e.prizes,
(SELECT COUNT(*) FROM participations p WHERE p.event_id = e.id) AS participant_count,
e.created_at, e.updated_at"#;

pub async fn create(conn: &mut SqliteConnection, args: CreateEventArgs<'_>) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (host_id, name, description, eligibility, start_date, end_date, max_participants, ",
        "status, rounds, judging_criteria, prizes, created_at, updated_at) ",
        "VALUES (?, ?, ?, ?, ?, ?, ?, 'upcoming', ?, ?, ?, ?, ?) RETURNING id"
    );
    let now = Utc::now();
    sqlx::query_scalar(QUERY)
        .bind(args.host_id)
        .bind(args.name)
        .bind(args.description)
        .bind(args.eligibility)
        .bind(args.start_date)
        .bind(args.end_date)
        .bind(args.max_participants)
        .bind(Json(args.rounds))
        .bind(args.judging_criteria)
        .bind(args.prizes)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await
}

pub async fn fetch_one<C: Context>(ctx: &C, event_id: i64) -> sqlx::Result<Option<Event>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " e WHERE e.id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(event_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_all_by_status<C: Context>(ctx: &C, status: &str) -> sqlx::Result<Vec<Event>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " e WHERE e.status = ? ORDER BY e.start_date ASC, e.id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(status)
        .fetch_all(ctx.db())
        .await
}

pub async fn fetch_by_host<C: Context>(ctx: &C, host_id: i64) -> sqlx::Result<Vec<Event>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " e WHERE e.host_id = ? ORDER BY e.created_at DESC, e.id DESC"
    );
    sqlx::query_as(QUERY)
        .bind(host_id)
        .fetch_all(ctx.db())
        .await
}

pub async fn fetch_by_judge<C: Context>(ctx: &C, judge_id: i64) -> sqlx::Result<Vec<Event>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " e INNER JOIN event_judges j ON j.event_id = e.id ",
        "WHERE j.user_id = ? ORDER BY e.start_date ASC, e.id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(judge_id)
        .fetch_all(ctx.db())
        .await
}

/// Moves the event from `from` to `to`. Returns false if the event was not in `from`.
pub async fn update_status<C: Context>(
    ctx: &C,
    event_id: i64,
    from: &str,
    to: &str,
) -> sqlx::Result<bool> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET status = ?, updated_at = ? WHERE id = ? AND status = ?"
    );
    let result = sqlx::query(QUERY)
        .bind(to)
        .bind(Utc::now())
        .bind(event_id)
        .bind(from)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Only applies while the event is still upcoming. Returns false otherwise.
pub async fn update_details<C: Context>(
    ctx: &C,
    event_id: i64,
    args: UpdateEventArgs<'_>,
) -> sqlx::Result<bool> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET description = ?, eligibility = ?, rounds = ?, judging_criteria = ?, ",
        "prizes = ?, updated_at = ? WHERE id = ? AND status = 'upcoming'"
    );
    let result = sqlx::query(QUERY)
        .bind(args.description)
        .bind(args.eligibility)
        .bind(Json(args.rounds))
        .bind(args.judging_criteria)
        .bind(args.prizes)
        .bind(Utc::now())
        .bind(event_id)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Starts every upcoming event whose start date has passed, returning their ids.
pub async fn start_due<C: Context>(ctx: &C, now: DateTime<Utc>) -> sqlx::Result<Vec<i64>> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET status = 'ongoing', updated_at = ? ",
        "WHERE status = 'upcoming' AND start_date <= ? RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(now)
        .bind(now)
        .fetch_all(ctx.db())
        .await
}

pub async fn count_by_host<C: Context>(ctx: &C, host_id: i64) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!("SELECT COUNT(*) FROM ", TABLE_NAME, " WHERE host_id = ?");
    sqlx::query_scalar(QUERY)
        .bind(host_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn add_judges(
    conn: &mut SqliteConnection,
    event_id: i64,
    judge_ids: &[i64],
) -> sqlx::Result<()> {
    const QUERY: &str = "INSERT OR IGNORE INTO event_judges (event_id, user_id) VALUES (?, ?)";
    for judge_id in judge_ids {
        sqlx::query(QUERY)
            .bind(event_id)
            .bind(judge_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn fetch_judge_ids<C: Context>(ctx: &C, event_id: i64) -> sqlx::Result<Vec<i64>> {
    const QUERY: &str = "SELECT user_id FROM event_judges WHERE event_id = ? ORDER BY user_id";
    sqlx::query_scalar(QUERY)
        .bind(event_id)
        .fetch_all(ctx.db())
        .await
}

pub async fn count_by_judge<C: Context>(ctx: &C, judge_id: i64) -> sqlx::Result<i64> {
    const QUERY: &str = "SELECT COUNT(*) FROM event_judges WHERE user_id = ?";
    sqlx::query_scalar(QUERY)
        .bind(judge_id)
        .fetch_one(ctx.db())
        .await
}
