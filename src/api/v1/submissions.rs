use crate::api::{AuthSession, JsonBody, RequestContext};
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::reviews::{Review, ReviewArgs};
use crate::models::submissions::{
    AttachmentQuery, AttachmentResponse, ScoredSubmission, SubmitArgs, Submission,
};
use crate::usecases::{reviews, submissions};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::StatusCode;

pub async fn submit(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(participation_id): Path<i64>,
    JsonBody(args): JsonBody<SubmitArgs>,
) -> ServiceResult<(StatusCode, Json<Submission>)> {
    let submission = submissions::submit(&ctx, &session, participation_id, args).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn upload_attachment(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(participation_id): Path<i64>,
    Query(query): Query<AttachmentQuery>,
    body: Bytes,
) -> ServiceResponse<AttachmentResponse> {
    let file_url = submissions::upload_attachment(
        &ctx,
        &session,
        participation_id,
        &query.file_name,
        body.to_vec(),
    )
    .await?;
    Ok(Json(AttachmentResponse { file_url }))
}

pub async fn fetch_one(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(submission_id): Path<i64>,
) -> ServiceResponse<ScoredSubmission> {
    let submission = submissions::fetch_one(&ctx, &session, submission_id).await?;
    Ok(Json(submission))
}

pub async fn by_event(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(event_id): Path<i64>,
) -> ServiceResponse<Vec<ScoredSubmission>> {
    let submissions = submissions::fetch_by_event(&ctx, &session, event_id).await?;
    Ok(Json(submissions))
}

pub async fn review(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(submission_id): Path<i64>,
    JsonBody(args): JsonBody<ReviewArgs>,
) -> ServiceResult<(StatusCode, Json<Review>)> {
    let review =
        reviews::review(&ctx, &session, submission_id, args.rating, &args.feedback).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
