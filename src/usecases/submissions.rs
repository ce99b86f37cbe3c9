use crate::adapters::object_storage::{content_type_for, file_extension};
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, is_unique_violation, unexpected};
use crate::entities::submissions::CreateSubmissionArgs;
use crate::models::events::EventStatus;
use crate::models::reviews::{Review, aggregate_score};
use crate::models::sessions::Session;
use crate::models::submissions::{
    MAX_ATTACHMENT_SIZE, ScoredSubmission, SubmitArgs, Submission, non_blank,
};
use crate::repositories::{reviews, submissions};
use crate::usecases::{events, participations};
use chrono::Utc;
use tracing::info;

pub async fn submit<C: Context>(
    ctx: &C,
    session: &Session,
    participation_id: i64,
    args: SubmitArgs,
) -> ServiceResult<Submission> {
    let participation = participations::fetch_owned(ctx, session, participation_id).await?;
    let event = events::fetch_one(ctx, participation.event_id).await?;
    if event.status != EventStatus::Ongoing {
        return Err(AppError::SubmissionsClosed);
    }
    if submissions::fetch_one_by_participation(ctx, participation_id)
        .await?
        .is_some()
    {
        return Err(AppError::SubmissionsDuplicate);
    }
    args.validate()?;

    let create_args = CreateSubmissionArgs {
        participation_id,
        github_link: args.github_link.trim(),
        demo_link: non_blank(args.demo_link.as_deref()),
        file_url: non_blank(args.file_url.as_deref()),
        description: args.description.trim(),
    };
    let submission_id = match submissions::create(ctx, create_args).await {
        Ok(Some(submission_id)) => submission_id,
        Ok(None) => return Err(AppError::SubmissionsClosed),
        Err(e) if is_unique_violation(&e) => return Err(AppError::SubmissionsDuplicate),
        Err(e) => return unexpected(e),
    };

    info!(
        submission_id,
        participation_id,
        event_id = event.event_id,
        "Project submitted"
    );
    match submissions::fetch_one(ctx, submission_id).await? {
        Some(submission) => Ok(Submission::from(submission)),
        None => Err(AppError::SubmissionsNotFound),
    }
}

/// Stores an attachment for the caller's submission and returns its public URL.
pub async fn upload_attachment<C: Context>(
    ctx: &C,
    session: &Session,
    participation_id: i64,
    file_name: &str,
    data: Vec<u8>,
) -> ServiceResult<String> {
    let participation = participations::fetch_owned(ctx, session, participation_id).await?;
    if data.len() > MAX_ATTACHMENT_SIZE {
        return Err(AppError::SubmissionsFileTooLarge);
    }

    let path = format!(
        "submissions/{}_{}.{}",
        participation.participation_id,
        Utc::now().timestamp_millis(),
        file_extension(file_name),
    );
    let size = data.len();
    let url = ctx
        .storage()
        .upload(&path, content_type_for(file_name), data)
        .await?;
    info!(participation_id, size, path = %path, "Submission attachment uploaded");
    Ok(url)
}

pub async fn fetch_one<C: Context>(
    ctx: &C,
    session: &Session,
    submission_id: i64,
) -> ServiceResult<ScoredSubmission> {
    let Some(submission) = submissions::fetch_one(ctx, submission_id).await? else {
        return Err(AppError::SubmissionsNotFound);
    };
    let submission = Submission::from(submission);
    let capabilities =
        events::fetch_capabilities(ctx, session.user_id, submission.event_id).await?;
    let participation = participations::fetch_one(ctx, submission.participation_id).await?;
    if !capabilities.can_view_submissions() && participation.user_id != session.user_id {
        return Err(AppError::SubmissionsUnauthorized);
    }
    with_reviews(ctx, submission).await
}

/// All submissions of an event with their reviews. Host and judges only.
pub async fn fetch_by_event<C: Context>(
    ctx: &C,
    session: &Session,
    event_id: i64,
) -> ServiceResult<Vec<ScoredSubmission>> {
    let capabilities = events::fetch_capabilities(ctx, session.user_id, event_id).await?;
    if !capabilities.can_view_submissions() {
        return Err(AppError::SubmissionsUnauthorized);
    }

    let submissions = submissions::fetch_by_event(ctx, event_id).await?;
    let mut scored = Vec::with_capacity(submissions.len());
    for submission in submissions {
        scored.push(with_reviews(ctx, Submission::from(submission)).await?);
    }
    Ok(scored)
}

async fn with_reviews<C: Context>(
    ctx: &C,
    submission: Submission,
) -> ServiceResult<ScoredSubmission> {
    let reviews: Vec<Review> = reviews::fetch_by_submission(ctx, submission.submission_id)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();
    Ok(ScoredSubmission {
        aggregate_score: aggregate_score(&reviews),
        submission,
        reviews,
    })
}
