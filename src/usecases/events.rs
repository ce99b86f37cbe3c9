use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, is_unique_violation, unexpected};
use crate::entities::events::{
    CreateEventArgs as CreateEventRow, Event as EventEntity, UpdateEventArgs as UpdateEventRow,
};
use crate::models::capabilities::EventCapabilities;
use crate::models::events::{CreateEventArgs, Event, EventStatus, UpdateEventArgs};
use crate::models::participations::Participation;
use crate::models::sessions::Session;
use crate::models::users::normalize_email;
use crate::repositories::{chats, events, participations};
use crate::usecases::users;
use chrono::Utc;
use tracing::{info, warn};

pub async fn fetch_one<C: Context>(ctx: &C, event_id: i64) -> ServiceResult<Event> {
    match events::fetch_one(ctx, event_id).await? {
        Some(event) => with_judges(ctx, event).await,
        None => Err(AppError::EventsNotFound),
    }
}

pub async fn fetch_all_by_status<C: Context>(
    ctx: &C,
    status: EventStatus,
) -> ServiceResult<Vec<Event>> {
    let events = events::fetch_all_by_status(ctx, status.as_str()).await?;
    with_judges_many(ctx, events).await
}

pub async fn fetch_hosted<C: Context>(ctx: &C, session: &Session) -> ServiceResult<Vec<Event>> {
    let events = events::fetch_by_host(ctx, session.user_id).await?;
    with_judges_many(ctx, events).await
}

pub async fn fetch_judged<C: Context>(ctx: &C, session: &Session) -> ServiceResult<Vec<Event>> {
    let events = events::fetch_by_judge(ctx, session.user_id).await?;
    with_judges_many(ctx, events).await
}

pub async fn fetch_capabilities<C: Context>(
    ctx: &C,
    user_id: i64,
    event_id: i64,
) -> ServiceResult<EventCapabilities> {
    let event = fetch_one(ctx, event_id).await?;
    let participation =
        participations::fetch_one_by_event_and_user(ctx, event_id, user_id).await?;
    Ok(event.capabilities_for(user_id, participation.is_some()))
}

async fn with_judges<C: Context>(ctx: &C, event: EventEntity) -> ServiceResult<Event> {
    let judge_ids = events::fetch_judge_ids(ctx, event.id).await?;
    Event::from_entity(event, judge_ids)
}

async fn with_judges_many<C: Context>(
    ctx: &C,
    events: Vec<EventEntity>,
) -> ServiceResult<Vec<Event>> {
    let mut result = Vec::with_capacity(events.len());
    for event in events {
        result.push(with_judges(ctx, event).await?);
    }
    Ok(result)
}

/// Every email must belong to an existing user.
async fn resolve_judges<C: Context>(ctx: &C, judge_emails: &[String]) -> ServiceResult<Vec<i64>> {
    let mut emails: Vec<String> = judge_emails
        .iter()
        .map(|email| normalize_email(email))
        .filter(|email| !email.is_empty())
        .collect();
    emails.sort_unstable();
    emails.dedup();

    let judges = users::fetch_many_by_emails(ctx, &emails).await?;
    if judges.len() != emails.len() {
        let unknown: Vec<&String> = emails
            .iter()
            .filter(|email| !judges.iter().any(|judge| &judge.email == *email))
            .collect();
        warn!(?unknown, "Event judges could not be resolved");
        return Err(AppError::EventsUnknownJudge);
    }
    Ok(judges.into_iter().map(|judge| judge.user_id).collect())
}

pub async fn create<C: Context>(
    ctx: &C,
    session: &Session,
    args: CreateEventArgs,
) -> ServiceResult<Event> {
    args.validate()?;
    let judge_ids = resolve_judges(ctx, &args.judge_emails).await?;

    // The event, its judges and its chat become visible together or not at all.
    let mut tx = ctx.db().begin().await?;
    let event_id = events::create(
        &mut tx,
        CreateEventRow {
            host_id: session.user_id,
            name: args.name.trim(),
            description: &args.description,
            eligibility: &args.eligibility,
            start_date: args.start_date,
            end_date: args.end_date,
            max_participants: args.max_participants,
            rounds: &args.rounds,
            judging_criteria: &args.judging_criteria,
            prizes: &args.prizes,
        },
    )
    .await?;
    events::add_judges(&mut tx, event_id, &judge_ids).await?;

    let chat_id = chats::create_event_chat(&mut tx, event_id).await?;
    chats::add_member(&mut tx, chat_id, session.user_id).await?;
    for judge_id in &judge_ids {
        chats::add_member(&mut tx, chat_id, *judge_id).await?;
    }
    tx.commit().await?;

    info!(
        event_id,
        host_id = session.user_id,
        judges = judge_ids.len(),
        "Event created"
    );
    fetch_one(ctx, event_id).await
}

pub async fn join<C: Context>(
    ctx: &C,
    session: &Session,
    event_id: i64,
    team_name: &str,
) -> ServiceResult<Participation> {
    let team_name = team_name.trim();
    if team_name.is_empty() {
        return Err(AppError::ParticipationsInvalidTeamName);
    }

    let event = fetch_one(ctx, event_id).await?;
    let existing =
        participations::fetch_one_by_event_and_user(ctx, event_id, session.user_id).await?;
    if existing.is_some() {
        return Err(AppError::ParticipationsAlreadyJoined);
    }
    if event.is_full() {
        return Err(AppError::EventsFull);
    }
    if event.status == EventStatus::Completed {
        return Err(AppError::EventsClosed);
    }

    let Some(chat) = chats::fetch_one_by_event(ctx, event_id).await? else {
        return unexpected(anyhow::anyhow!("event {event_id} has no chat"));
    };

    let mut tx = ctx.db().begin().await?;
    let participation =
        match participations::create(&mut tx, event_id, session.user_id, team_name).await {
            Ok(Some(participation)) => participation,
            // Lost a race: someone else took the last spot or the event completed.
            Ok(None) => {
                drop(tx);
                return Err(rejected_join(ctx, event_id, session.user_id).await?);
            }
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::ParticipationsAlreadyJoined);
            }
            Err(e) => return unexpected(e),
        };
    chats::add_member(&mut tx, chat.id, session.user_id).await?;
    tx.commit().await?;

    info!(
        event_id,
        user_id = session.user_id,
        participation_id = participation.id,
        "User joined event"
    );
    Ok(Participation::from(participation))
}

async fn rejected_join<C: Context>(
    ctx: &C,
    event_id: i64,
    user_id: i64,
) -> ServiceResult<AppError> {
    if participations::fetch_one_by_event_and_user(ctx, event_id, user_id)
        .await?
        .is_some()
    {
        return Ok(AppError::ParticipationsAlreadyJoined);
    }
    let event = fetch_one(ctx, event_id).await?;
    Ok(match event.is_full() {
        true => AppError::EventsFull,
        false => AppError::EventsClosed,
    })
}

/// Only the host may advance, and only to the immediate successor status.
pub async fn advance_status<C: Context>(
    ctx: &C,
    session: &Session,
    event_id: i64,
    target: EventStatus,
) -> ServiceResult<Event> {
    let event = fetch_one(ctx, event_id).await?;
    if !event.is_host(session.user_id) || !event.status.can_advance_to(target) {
        return Err(AppError::EventsInvalidTransition);
    }

    let updated =
        events::update_status(ctx, event_id, event.status.as_str(), target.as_str()).await?;
    if !updated {
        return Err(AppError::EventsInvalidTransition);
    }

    info!(event_id, from = %event.status, to = %target, "Event status advanced");
    fetch_one(ctx, event_id).await
}

pub async fn update_details<C: Context>(
    ctx: &C,
    session: &Session,
    event_id: i64,
    args: UpdateEventArgs,
) -> ServiceResult<Event> {
    let event = fetch_one(ctx, event_id).await?;
    if !event.is_host(session.user_id) {
        return Err(AppError::EventsUnauthorized);
    }
    if event.status != EventStatus::Upcoming {
        return Err(AppError::EventsNotEditable);
    }

    let updated = events::update_details(
        ctx,
        event_id,
        UpdateEventRow {
            description: args.description.as_deref().unwrap_or(&event.description),
            eligibility: args.eligibility.as_deref().unwrap_or(&event.eligibility),
            rounds: args.rounds.as_deref().unwrap_or(&event.rounds),
            judging_criteria: args
                .judging_criteria
                .as_deref()
                .unwrap_or(&event.judging_criteria),
            prizes: args.prizes.as_deref().unwrap_or(&event.prizes),
        },
    )
    .await?;
    if !updated {
        return Err(AppError::EventsNotEditable);
    }

    info!(event_id, "Event details updated");
    fetch_one(ctx, event_id).await
}

/// Moves every upcoming event whose start date has passed to ongoing.
pub async fn start_due<C: Context>(ctx: &C) -> ServiceResult<usize> {
    let started = events::start_due(ctx, Utc::now()).await?;
    for event_id in &started {
        info!(event_id, "Event started");
    }
    Ok(started.len())
}
