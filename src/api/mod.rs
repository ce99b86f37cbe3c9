use crate::adapters::object_storage::ObjectStorage;
use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::init;
use crate::common::realtime::RealtimeHub;
use crate::common::state::AppState;
use crate::models::sessions::Session;
use crate::settings::AppSettings;
use crate::usecases::sessions;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{Json, Router};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sqlx::{Pool, Sqlite};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};
use uuid::Uuid;

pub mod v1;

pub struct RequestContext {
    pub db: Pool<Sqlite>,
    pub realtime: RealtimeHub,
    pub storage: Arc<dyn ObjectStorage>,
}

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", v1::router())
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let app = router().with_state(state);
    let addr = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = TcpListener::bind(addr).await?;
    info!("Serving API on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            db: state.db.clone(),
            realtime: state.realtime.clone(),
            storage: state.storage.clone(),
        })
    }
}

impl Context for RequestContext {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }

    fn realtime(&self) -> &RealtimeHub {
        &self.realtime
    }

    fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }
}

/// The caller's session, from `Authorization: Bearer <session id>`.
/// Event streams cannot set headers, so `?access_token=` is accepted too.
pub struct AuthSession(pub Session);

#[derive(Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

fn session_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);
    header.or_else(|| {
        Query::<AccessTokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.access_token)
    })
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Unauthorized)?;
        let session_id = Uuid::parse_str(token.trim()).map_err(|_| AppError::SessionsNotFound)?;
        let session = sessions::fetch_one(state, session_id).await?;
        Ok(Self(session))
    }
}

/// JSON request body whose decoding failures render as an `AppError`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Failed to decode request body: {rejection}");
                Err(AppError::DecodingRequestFailed)
            }
        }
    }
}
