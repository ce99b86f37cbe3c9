use crate::api::{AuthSession, JsonBody, RequestContext};
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::chats::{Chat, OpenDirectArgs};
use crate::models::messages::{Message, PostMessageArgs};
use crate::usecases::{chats, messages};
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use std::convert::Infallible;

pub async fn mine(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResponse<Vec<Chat>> {
    let chats = chats::fetch_mine(&ctx, &session).await?;
    Ok(Json(chats))
}

pub async fn open_direct(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    JsonBody(args): JsonBody<OpenDirectArgs>,
) -> ServiceResponse<Chat> {
    let chat = chats::open_direct(&ctx, &session, args.user_id).await?;
    Ok(Json(chat))
}

pub async fn history(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(chat_id): Path<i64>,
) -> ServiceResponse<Vec<Message>> {
    let messages = messages::fetch_history(&ctx, &session, chat_id).await?;
    Ok(Json(messages))
}

pub async fn post_message(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(chat_id): Path<i64>,
    JsonBody(args): JsonBody<PostMessageArgs>,
) -> ServiceResult<(StatusCode, Json<Message>)> {
    let message = messages::post(&ctx, &session, chat_id, &args.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn stream(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
    Path(chat_id): Path<i64>,
) -> ServiceResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let subscription = messages::subscribe(&ctx, &session, chat_id).await?;
    let events = subscription.filter_map(|message| async move {
        Event::default()
            .event("message")
            .id(message.message_id.to_string())
            .json_data(&message)
            .ok()
            .map(Ok)
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
