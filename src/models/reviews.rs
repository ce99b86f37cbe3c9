use crate::common::error::{AppError, ServiceResult};
use crate::entities::reviews::Review as ReviewEntity;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub review_id: i64,
    pub submission_id: i64,
    pub judge_id: i64,
    pub judge_name: String,
    pub rating: i64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewEntity> for Review {
    fn from(value: ReviewEntity) -> Self {
        Self {
            review_id: value.id,
            submission_id: value.submission_id,
            judge_id: value.judge_id,
            judge_name: value.judge_name,
            rating: value.rating,
            feedback: value.feedback,
            created_at: value.created_at,
        }
    }
}

pub fn validate(rating: i64, feedback: &str) -> ServiceResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::ReviewsInvalidRating);
    }
    if feedback.trim().is_empty() {
        return Err(AppError::ReviewsMissingFeedback);
    }
    Ok(())
}

/// Mean rating rounded to two decimal places; `None` until someone has reviewed.
pub fn aggregate_score(reviews: &[Review]) -> Option<Decimal> {
    if reviews.is_empty() {
        return None;
    }
    let total: i64 = reviews.iter().map(|review| review.rating).sum();
    let mean = Decimal::from(total) / Decimal::from(reviews.len() as i64);
    Some(mean.round_dp(2))
}

#[derive(Debug, Deserialize)]
pub struct ReviewArgs {
    pub rating: i64,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i64) -> Review {
        Review {
            review_id: rating,
            submission_id: 1,
            judge_id: rating,
            judge_name: "Judge".to_owned(),
            rating,
            feedback: "ok".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn aggregate_is_the_mean_rating() {
        assert_eq!(aggregate_score(&[]), None);
        assert_eq!(aggregate_score(&[review(8)]), Some(Decimal::from(8)));
        assert_eq!(
            aggregate_score(&[review(7), review(8)]),
            Some(Decimal::new(750, 2))
        );
        assert_eq!(
            aggregate_score(&[review(10), review(9), review(9)]),
            Some(Decimal::new(933, 2))
        );
    }

    #[test]
    fn rating_bounds_and_feedback() {
        assert_eq!(validate(1, "fine"), Ok(()));
        assert_eq!(validate(10, "great"), Ok(()));
        assert_eq!(validate(0, "meh"), Err(AppError::ReviewsInvalidRating));
        assert_eq!(validate(11, "wow"), Err(AppError::ReviewsInvalidRating));
        assert_eq!(validate(5, "   "), Err(AppError::ReviewsMissingFeedback));
    }
}
