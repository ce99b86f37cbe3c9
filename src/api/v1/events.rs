use crate::api::{AuthSession, JsonBody, RequestContext};
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::events::{
    AdvanceStatusArgs, CreateEventArgs, Event, EventsQuery, JoinArgs, UpdateEventArgs,
};
use crate::models::participations::Participation;
use crate::usecases::events;
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::StatusCode;

pub async fn list(
    ctx: RequestContext,
    Query(query): Query<EventsQuery>,
) -> ServiceResponse<Vec<Event>> {
    let events = events::fetch_all_by_status(&ctx, query.status).await?;
    Ok(Json(events))
}

pub async fn create(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    JsonBody(args): JsonBody<CreateEventArgs>,
) -> ServiceResult<(StatusCode, Json<Event>)> {
    let event = events::create(&ctx, &session, args).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn hosted(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResponse<Vec<Event>> {
    let events = events::fetch_hosted(&ctx, &session).await?;
    Ok(Json(events))
}

pub async fn judging(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResponse<Vec<Event>> {
    let events = events::fetch_judged(&ctx, &session).await?;
    Ok(Json(events))
}

pub async fn fetch_one(ctx: RequestContext, Path(event_id): Path<i64>) -> ServiceResponse<Event> {
    let event = events::fetch_one(&ctx, event_id).await?;
    Ok(Json(event))
}

pub async fn update(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(event_id): Path<i64>,
    JsonBody(args): JsonBody<UpdateEventArgs>,
) -> ServiceResponse<Event> {
    let event = events::update_details(&ctx, &session, event_id, args).await?;
    Ok(Json(event))
}

pub async fn advance_status(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(event_id): Path<i64>,
    JsonBody(args): JsonBody<AdvanceStatusArgs>,
) -> ServiceResponse<Event> {
    let event = events::advance_status(&ctx, &session, event_id, args.status).await?;
    Ok(Json(event))
}

pub async fn join(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(event_id): Path<i64>,
    JsonBody(args): JsonBody<JoinArgs>,
) -> ServiceResult<(StatusCode, Json<Participation>)> {
    let participation = events::join(&ctx, &session, event_id, &args.team_name).await?;
    Ok((StatusCode::CREATED, Json(participation)))
}
