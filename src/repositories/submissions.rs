use crate::common::context::Context;
use crate::entities::submissions::{CreateSubmissionArgs, Submission};
use chrono::Utc;

const READ_FIELDS: &str = const_str::concat!(
    "s.id, s.participation_id, p.event_id, p.team_name, s.github_link, s.demo_link, ",
    "s.file_url, s.description, s.submitted_at ",
    "FROM submissions s INNER JOIN participations p ON p.id = s.participation_id"
);

/// Inserts the submission only while the participation's event is ongoing.
/// Returns `None` if the event gate rejected the insert.
pub async fn create<C: Context>(
    ctx: &C,
    args: CreateSubmissionArgs<'_>,
) -> sqlx::Result<Option<i64>> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO submissions ",
        "(participation_id, github_link, demo_link, file_url, description, submitted_at) ",
        "SELECT p.id, ?, ?, ?, ?, ? FROM participations p ",
        "INNER JOIN events e ON e.id = p.event_id ",
        "WHERE p.id = ? AND e.status = 'ongoing' RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(args.github_link)
        .bind(args.demo_link)
        .bind(args.file_url)
        .bind(args.description)
        .bind(Utc::now())
        .bind(args.participation_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_one<C: Context>(ctx: &C, submission_id: i64) -> sqlx::Result<Option<Submission>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE s.id = ?");
    sqlx::query_as(QUERY)
        .bind(submission_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_one_by_participation<C: Context>(
    ctx: &C,
    participation_id: i64,
) -> sqlx::Result<Option<Submission>> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE s.participation_id = ?");
    sqlx::query_as(QUERY)
        .bind(participation_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_by_event<C: Context>(ctx: &C, event_id: i64) -> sqlx::Result<Vec<Submission>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " WHERE p.event_id = ? ORDER BY s.submitted_at ASC, s.id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(event_id)
        .fetch_all(ctx.db())
        .await
}
