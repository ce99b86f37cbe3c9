use crate::api::{AuthSession, RequestContext};
use crate::common::error::ServiceResponse;
use crate::models::participations::ParticipationOverview;
use crate::usecases::participations;
use axum::Json;

pub async fn mine(
    ctx: RequestContext,
    AuthSession(session): AuthSession,
) -> ServiceResponse<Vec<ParticipationOverview>> {
    let participations = participations::fetch_mine(&ctx, &session).await?;
    Ok(Json(participations))
}
