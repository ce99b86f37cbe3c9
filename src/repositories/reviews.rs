use crate::common::context::Context;
use crate::entities::reviews::Review;
use chrono::Utc;

const READ_FIELDS: &str = const_str::concat!(
    "r.id, r.submission_id, r.judge_id, u.name AS judge_name, r.rating, r.feedback, r.created_at ",
    "FROM reviews r INNER JOIN users u ON u.id = r.judge_id"
);

pub async fn create<C: Context>(
    ctx: &C,
    submission_id: i64,
    judge_id: i64,
    rating: i64,
    feedback: &str,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO reviews (submission_id, judge_id, rating, feedback, created_at) ",
        "VALUES (?, ?, ?, ?, ?) RETURNING id"
    );
    sqlx::query_scalar(QUERY)
        .bind(submission_id)
        .bind(judge_id)
        .bind(rating)
        .bind(feedback)
        .bind(Utc::now())
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_one<C: Context>(ctx: &C, review_id: i64) -> sqlx::Result<Review> {
    const QUERY: &str = const_str::concat!("SELECT ", READ_FIELDS, " WHERE r.id = ?");
    sqlx::query_as(QUERY)
        .bind(review_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn exists<C: Context>(ctx: &C, submission_id: i64, judge_id: i64) -> sqlx::Result<bool> {
    const QUERY: &str =
        "SELECT EXISTS (SELECT 1 FROM reviews WHERE submission_id = ? AND judge_id = ?)";
    sqlx::query_scalar(QUERY)
        .bind(submission_id)
        .bind(judge_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_by_submission<C: Context>(
    ctx: &C,
    submission_id: i64,
) -> sqlx::Result<Vec<Review>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " WHERE r.submission_id = ? ORDER BY r.created_at ASC, r.id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(submission_id)
        .fetch_all(ctx.db())
        .await
}
