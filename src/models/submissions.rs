use crate::common::error::{AppError, ServiceResult};
use crate::entities::submissions::Submission as SubmissionEntity;
use crate::models::reviews::Review;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub submission_id: i64,
    pub participation_id: i64,
    pub event_id: i64,
    pub team_name: String,
    pub github_link: String,
    pub demo_link: Option<String>,
    pub file_url: Option<String>,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<SubmissionEntity> for Submission {
    fn from(value: SubmissionEntity) -> Self {
        Self {
            submission_id: value.id,
            participation_id: value.participation_id,
            event_id: value.event_id,
            team_name: value.team_name,
            github_link: value.github_link,
            demo_link: value.demo_link,
            file_url: value.file_url,
            description: value.description,
            submitted_at: value.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitArgs {
    pub github_link: String,
    #[serde(default)]
    pub demo_link: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    pub description: String,
}

impl SubmitArgs {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.github_link.trim().is_empty() {
            return Err(AppError::SubmissionsMissingGithubLink);
        }
        if self.description.trim().is_empty() {
            return Err(AppError::SubmissionsMissingDescription);
        }
        Ok(())
    }
}

/// Blank optional links are stored as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ScoredSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub reviews: Vec<Review>,
    pub aggregate_score: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentQuery {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub file_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_link_and_description_are_required() {
        let args = SubmitArgs {
            github_link: "https://github.com/team/project".to_owned(),
            description: "A project".to_owned(),
            ..Default::default()
        };
        assert_eq!(args.validate(), Ok(()));

        let no_link = SubmitArgs {
            github_link: " ".to_owned(),
            ..args.clone()
        };
        assert_eq!(no_link.validate(), Err(AppError::SubmissionsMissingGithubLink));

        let no_description = SubmitArgs {
            description: String::new(),
            ..args
        };
        assert_eq!(
            no_description.validate(),
            Err(AppError::SubmissionsMissingDescription)
        );
    }

    #[test]
    fn blank_optional_links_are_dropped() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" https://demo ")), Some("https://demo"));
    }
}
