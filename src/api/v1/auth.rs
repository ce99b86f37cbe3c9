use crate::api::{AuthSession, JsonBody, RequestContext};
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::sessions::{LoginArgs, Session, SignupArgs};
use crate::models::users::Profile;
use crate::usecases::{profiles, sessions, users};
use axum::Json;
use axum::http::StatusCode;

pub async fn signup(
    ctx: RequestContext,
    JsonBody(args): JsonBody<SignupArgs>,
) -> ServiceResult<(StatusCode, Json<Session>)> {
    let session = users::signup(&ctx, &args.name, &args.email, &args.password).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    ctx: RequestContext,
    JsonBody(args): JsonBody<LoginArgs>,
) -> ServiceResponse<Session> {
    let session = sessions::login(&ctx, &args.email, &args.password).await?;
    Ok(Json(session))
}

pub async fn logout(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResult<StatusCode> {
    sessions::logout(&ctx, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn profile(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResponse<Profile> {
    let profile = profiles::fetch_one(&ctx, session.user_id).await?;
    Ok(Json(profile))
}
