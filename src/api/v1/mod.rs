pub mod auth;
pub mod chats;
pub mod events;
pub mod participations;
pub mod submissions;

use crate::common::state::AppState;
use crate::models::submissions::MAX_ATTACHMENT_SIZE;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
        .route("/events", get(events::list).post(events::create))
        .route("/events/hosted", get(events::hosted))
        .route("/events/judging", get(events::judging))
        .route("/events/{event_id}", get(events::fetch_one).patch(events::update))
        .route("/events/{event_id}/status", post(events::advance_status))
        .route("/events/{event_id}/join", post(events::join))
        .route("/events/{event_id}/submissions", get(submissions::by_event))
        .route("/participations", get(participations::mine))
        .route(
            "/participations/{participation_id}/submission",
            post(submissions::submit),
        )
        .route(
            "/participations/{participation_id}/attachment",
            post(submissions::upload_attachment)
                .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_SIZE + 1)),
        )
        .route("/submissions/{submission_id}", get(submissions::fetch_one))
        .route("/submissions/{submission_id}/reviews", post(submissions::review))
        .route("/chats", get(chats::mine))
        .route("/chats/direct", post(chats::open_direct))
        .route(
            "/chats/{chat_id}/messages",
            get(chats::history).post(chats::post_message),
        )
        .route("/chats/{chat_id}/stream", get(chats::stream))
}
