use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::sessions::Session;
use crate::models::users::normalize_email;
use crate::repositories::{sessions, users};
use tracing::info;
use uuid::Uuid;

pub async fn create<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<Session> {
    let session = sessions::create(ctx, user_id).await?;
    Ok(Session::from(session))
}

pub async fn login<C: Context>(ctx: &C, email: &str, password: &str) -> ServiceResult<Session> {
    let user = match users::fetch_one_by_email(ctx, &normalize_email(email)).await {
        Ok(user) => user,
        Err(sqlx::Error::RowNotFound) => return Err(AppError::SessionsInvalidCredentials),
        Err(e) => return unexpected(e),
    };

    if !bcrypt::verify(password, &user.password_hash)? {
        return Err(AppError::SessionsInvalidCredentials);
    }

    let session = create(ctx, user.id).await?;
    info!(user_id = user.id, "User logged in");
    Ok(session)
}

pub async fn logout<C: Context>(ctx: &C, session: &Session) -> ServiceResult<()> {
    if !sessions::delete(ctx, session.session_id).await? {
        return Err(AppError::SessionsNotFound);
    }
    info!(user_id = session.user_id, "User logged out");
    Ok(())
}

pub async fn fetch_one<C: Context>(ctx: &C, session_id: Uuid) -> ServiceResult<Session> {
    match sessions::fetch_one(ctx, session_id).await? {
        Some(session) => Ok(Session::from(session)),
        None => Err(AppError::SessionsNotFound),
    }
}
