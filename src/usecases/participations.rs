use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::models::participations::{Participation, ParticipationOverview};
use crate::models::sessions::Session;
use crate::models::submissions::Submission;
use crate::repositories::{participations, submissions};
use crate::usecases::events;

pub async fn fetch_one<C: Context>(ctx: &C, participation_id: i64) -> ServiceResult<Participation> {
    match participations::fetch_one(ctx, participation_id).await? {
        Some(participation) => Ok(Participation::from(participation)),
        None => Err(AppError::ParticipationsNotFound),
    }
}

/// Fetches a participation on behalf of its owner.
pub async fn fetch_owned<C: Context>(
    ctx: &C,
    session: &Session,
    participation_id: i64,
) -> ServiceResult<Participation> {
    let participation = fetch_one(ctx, participation_id).await?;
    if participation.user_id != session.user_id {
        return Err(AppError::ParticipationsUnauthorized);
    }
    Ok(participation)
}

pub async fn fetch_mine<C: Context>(
    ctx: &C,
    session: &Session,
) -> ServiceResult<Vec<ParticipationOverview>> {
    let participations = participations::fetch_by_user(ctx, session.user_id).await?;
    let mut overviews = Vec::with_capacity(participations.len());
    for participation in participations {
        let event = events::fetch_one(ctx, participation.event_id).await?;
        let submission = submissions::fetch_one_by_participation(ctx, participation.id)
            .await?
            .map(Submission::from);
        overviews.push(ParticipationOverview {
            participation: Participation::from(participation),
            event,
            submission,
        });
    }
    Ok(overviews)
}
