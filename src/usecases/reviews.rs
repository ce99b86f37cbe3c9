use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, is_unique_violation, unexpected};
use crate::models::reviews::{Review, validate};
use crate::models::sessions::Session;
use crate::repositories::{reviews, submissions};
use crate::usecases::events;
use tracing::info;

/// Records a judge's rating of a submission. Reviews are immutable once created.
pub async fn review<C: Context>(
    ctx: &C,
    session: &Session,
    submission_id: i64,
    rating: i64,
    feedback: &str,
) -> ServiceResult<Review> {
    let Some(submission) = submissions::fetch_one(ctx, submission_id).await? else {
        return Err(AppError::SubmissionsNotFound);
    };
    let event = events::fetch_one(ctx, submission.event_id).await?;
    if !event.is_judge(session.user_id) {
        return Err(AppError::ReviewsUnauthorized);
    }
    if reviews::exists(ctx, submission_id, session.user_id).await? {
        return Err(AppError::ReviewsDuplicate);
    }
    validate(rating, feedback)?;

    let review_id =
        match reviews::create(ctx, submission_id, session.user_id, rating, feedback.trim()).await {
            Ok(review_id) => review_id,
            Err(e) if is_unique_violation(&e) => return Err(AppError::ReviewsDuplicate),
            Err(e) => return unexpected(e),
        };

    info!(
        review_id,
        submission_id,
        judge_id = session.user_id,
        rating,
        "Submission reviewed"
    );
    let review = reviews::fetch_one(ctx, review_id).await?;
    Ok(Review::from(review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::common::testing::TestContext;
    use crate::models::events::EventStatus;
    use crate::models::submissions::{Submission, SubmitArgs};
    use crate::usecases::submissions as submission_usecases;
    use futures::future::join_all;

    struct Scenario {
        host: Session,
        judge: Session,
        participant: Session,
        submission: Submission,
    }

    async fn scenario(ctx: &TestContext) -> Scenario {
        let host = ctx.user("Hopper").await;
        let judge = ctx.user("Grace").await;
        let participant = ctx.user("Ada").await;
        let event = ctx.event(&host, &[&judge], 10).await;
        let participation = events::join(ctx, &participant, event.event_id, "Team Rocket")
            .await
            .unwrap();
        events::advance_status(ctx, &host, event.event_id, EventStatus::Ongoing)
            .await
            .unwrap();
        let submission = submission_usecases::submit(
            ctx,
            &participant,
            participation.participation_id,
            SubmitArgs {
                github_link: "https://github.com/team/project".to_owned(),
                description: "A project".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        Scenario {
            host,
            judge,
            participant,
            submission,
        }
    }

    #[tokio::test]
    async fn assigned_judges_review_once() {
        let ctx = TestContext::new().await;
        let scenario = scenario(&ctx).await;
        let submission_id = scenario.submission.submission_id;

        let review = review(&ctx, &scenario.judge, submission_id, 9, " Great demo ")
            .await
            .unwrap();
        assert_eq!(review.rating, 9);
        assert_eq!(review.feedback, "Great demo");
        assert_eq!(review.judge_name, "Grace");

        let error = super::review(&ctx, &scenario.judge, submission_id, 3, "Changed my mind")
            .await
            .unwrap_err();
        assert_eq!(error, AppError::ReviewsDuplicate);
        assert_eq!(error.kind(), ErrorKind::DuplicateReview);
    }

    #[tokio::test]
    async fn identical_concurrent_reviews_accept_one() {
        let ctx = TestContext::new().await;
        let scenario = scenario(&ctx).await;
        let submission_id = scenario.submission.submission_id;

        let results =
            join_all((0..4).map(|_| review(&ctx, &scenario.judge, submission_id, 8, "Solid")))
                .await;
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|result| result.as_ref().err())
                .all(|error| *error == AppError::ReviewsDuplicate)
        );

        let error = reviews::create(&ctx, submission_id, scenario.judge.user_id, 5, "Again")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&error));
    }

    #[tokio::test]
    async fn only_assigned_judges_may_review() {
        let ctx = TestContext::new().await;
        let scenario = scenario(&ctx).await;
        let submission_id = scenario.submission.submission_id;

        for outsider in [&scenario.host, &scenario.participant] {
            let error = review(&ctx, outsider, submission_id, 8, "Looks good")
                .await
                .unwrap_err();
            assert_eq!(error, AppError::ReviewsUnauthorized);
            assert_eq!(error.kind(), ErrorKind::NotAuthorized);
        }
        assert_eq!(
            review(&ctx, &scenario.judge, 999, 8, "Looks good")
                .await
                .unwrap_err(),
            AppError::SubmissionsNotFound
        );
    }

    #[tokio::test]
    async fn rating_must_be_in_range_with_feedback() {
        let ctx = TestContext::new().await;
        let scenario = scenario(&ctx).await;
        let submission_id = scenario.submission.submission_id;

        for (rating, feedback, expected) in [
            (0, "too low", AppError::ReviewsInvalidRating),
            (11, "too high", AppError::ReviewsInvalidRating),
            (5, "", AppError::ReviewsMissingFeedback),
        ] {
            assert_eq!(
                review(&ctx, &scenario.judge, submission_id, rating, feedback)
                    .await
                    .unwrap_err(),
                expected
            );
        }
        review(&ctx, &scenario.judge, submission_id, 10, "Perfect")
            .await
            .unwrap();
    }
}
