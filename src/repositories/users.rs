use crate::common::context::Context;
use crate::entities::users::User;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

const TABLE_NAME: &str = "users";
const READ_FIELDS: &str = "id, email, name, password_hash, created_at";

pub async fn create<C: Context>(
    ctx: &C,
    email: &str,
    name: &str,
    password_hash: &str,
) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (email, name, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING ",
        READ_FIELDS
    );
    sqlx::query_as(QUERY)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_one<C: Context>(ctx: &C, user_id: i64) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(user_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_one_by_email<C: Context>(ctx: &C, email: &str) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE email = ?"
    );
    sqlx::query_as(QUERY)
        .bind(email)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_many_by_emails<C: Context>(
    ctx: &C,
    emails: &[String],
) -> sqlx::Result<Vec<User>> {
    if emails.is_empty() {
        return Ok(vec![]);
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE email IN ("
    ));
    let mut separated = query.separated(", ");
    for email in emails {
        separated.push_bind(email.as_str());
    }
    separated.push_unseparated(")");
    query.build_query_as().fetch_all(ctx.db()).await
}
