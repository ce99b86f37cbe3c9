use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

/// Returns true if the error is a unique constraint violation reported by the store.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

/// The error families callers recover from at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    AlreadyJoined,
    DuplicateSubmission,
    DuplicateReview,
    EventFull,
    EventClosed,
    InvalidTransition,
    NotAuthorized,
    NotFound,
    Unexpected,
}

#[derive(Debug, PartialEq)]
pub enum AppError {
    Unexpected,
    Unauthorized,
    DecodingRequestFailed,

    UsersNotFound,
    UsersEmailTaken,
    UsersInvalidName,
    UsersInvalidEmail,
    UsersPasswordTooShort,

    SessionsInvalidCredentials,
    SessionsNotFound,

    EventsNotFound,
    EventsInvalidName,
    EventsInvalidSchedule,
    EventsInvalidCapacity,
    EventsUnknownJudge,
    EventsFull,
    EventsClosed,
    EventsInvalidTransition,
    EventsUnauthorized,
    EventsNotEditable,

    ParticipationsNotFound,
    ParticipationsAlreadyJoined,
    ParticipationsInvalidTeamName,
    ParticipationsUnauthorized,

    SubmissionsNotFound,
    SubmissionsClosed,
    SubmissionsDuplicate,
    SubmissionsMissingGithubLink,
    SubmissionsMissingDescription,
    SubmissionsFileTooLarge,
    SubmissionsUnauthorized,

    ReviewsUnauthorized,
    ReviewsDuplicate,
    ReviewsInvalidRating,
    ReviewsMissingFeedback,

    ChatsNotFound,
    ChatsUnauthorized,
    ChatsInvalidRecipient,

    MessagesEmpty,
    MessagesTooLong,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Unauthorized => "unauthorized",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::UsersNotFound => "users.not_found",
            AppError::UsersEmailTaken => "users.email_taken",
            AppError::UsersInvalidName => "users.invalid_name",
            AppError::UsersInvalidEmail => "users.invalid_email",
            AppError::UsersPasswordTooShort => "users.password_too_short",

            AppError::SessionsInvalidCredentials => "sessions.invalid_credentials",
            AppError::SessionsNotFound => "sessions.not_found",

            AppError::EventsNotFound => "events.not_found",
            AppError::EventsInvalidName => "events.invalid_name",
            AppError::EventsInvalidSchedule => "events.invalid_schedule",
            AppError::EventsInvalidCapacity => "events.invalid_capacity",
            AppError::EventsUnknownJudge => "events.unknown_judge",
            AppError::EventsFull => "events.full",
            AppError::EventsClosed => "events.closed",
            AppError::EventsInvalidTransition => "events.invalid_transition",
            AppError::EventsUnauthorized => "events.unauthorized",
            AppError::EventsNotEditable => "events.not_editable",

            AppError::ParticipationsNotFound => "participations.not_found",
            AppError::ParticipationsAlreadyJoined => "participations.already_joined",
            AppError::ParticipationsInvalidTeamName => "participations.invalid_team_name",
            AppError::ParticipationsUnauthorized => "participations.unauthorized",

            AppError::SubmissionsNotFound => "submissions.not_found",
            AppError::SubmissionsClosed => "submissions.closed",
            AppError::SubmissionsDuplicate => "submissions.duplicate",
            AppError::SubmissionsMissingGithubLink => "submissions.missing_github_link",
            AppError::SubmissionsMissingDescription => "submissions.missing_description",
            AppError::SubmissionsFileTooLarge => "submissions.file_too_large",
            AppError::SubmissionsUnauthorized => "submissions.unauthorized",

            AppError::ReviewsUnauthorized => "reviews.unauthorized",
            AppError::ReviewsDuplicate => "reviews.duplicate",
            AppError::ReviewsInvalidRating => "reviews.invalid_rating",
            AppError::ReviewsMissingFeedback => "reviews.missing_feedback",

            AppError::ChatsNotFound => "chats.not_found",
            AppError::ChatsUnauthorized => "chats.unauthorized",
            AppError::ChatsInvalidRecipient => "chats.invalid_recipient",

            AppError::MessagesEmpty => "messages.empty",
            AppError::MessagesTooLong => "messages.too_long",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Unauthorized => "You need to be logged in to perform this action.",
            AppError::DecodingRequestFailed => "Failed to decode request",

            AppError::UsersNotFound => "This user does not exist.",
            AppError::UsersEmailTaken => "An account with this email already exists.",
            AppError::UsersInvalidName => "Your name must not be empty.",
            AppError::UsersInvalidEmail => "Please enter a valid email address.",
            AppError::UsersPasswordTooShort => "Your password must be at least 8 characters long.",

            AppError::SessionsInvalidCredentials => "You have entered an invalid email or password.",
            AppError::SessionsNotFound => "Your session has expired. Please log in again.",

            AppError::EventsNotFound => "The event could not be found.",
            AppError::EventsInvalidName => "The event name must not be empty.",
            AppError::EventsInvalidSchedule => "The event must end after it starts.",
            AppError::EventsInvalidCapacity => "The event must allow at least one participant.",
            AppError::EventsUnknownJudge => "One or more judge emails do not belong to a user.",
            AppError::EventsFull => "The event has no free spots left.",
            AppError::EventsClosed => "The event is closed.",
            AppError::EventsInvalidTransition => "The event cannot move to this status.",
            AppError::EventsUnauthorized => "Only the host can manage this event.",
            AppError::EventsNotEditable => "The event can only be edited before it starts.",

            AppError::ParticipationsNotFound => "The participation could not be found.",
            AppError::ParticipationsAlreadyJoined => "You have already joined this event.",
            AppError::ParticipationsInvalidTeamName => "The team name must not be empty.",
            AppError::ParticipationsUnauthorized => "This participation does not belong to you.",

            AppError::SubmissionsNotFound => "The submission could not be found.",
            AppError::SubmissionsClosed => "Submissions are only accepted while the event is ongoing.",
            AppError::SubmissionsDuplicate => "Your team has already submitted a project.",
            AppError::SubmissionsMissingGithubLink => "A GitHub repository link is required.",
            AppError::SubmissionsMissingDescription => "A project description is required.",
            AppError::SubmissionsFileTooLarge => "File size must be less than 10MB.",
            AppError::SubmissionsUnauthorized => {
                "Only the host and judges can view the submissions of this event."
            }

            AppError::ReviewsUnauthorized => "You are not a judge of this event.",
            AppError::ReviewsDuplicate => "You have already reviewed this submission.",
            AppError::ReviewsInvalidRating => "The rating must be between 1 and 10.",
            AppError::ReviewsMissingFeedback => "Please provide feedback with your rating.",

            AppError::ChatsNotFound => "The chat could not be found.",
            AppError::ChatsUnauthorized => "You are not a member of this chat.",
            AppError::ChatsInvalidRecipient => "You cannot open a chat with yourself.",

            AppError::MessagesEmpty => "Your message is empty. It has not been sent.",
            AppError::MessagesTooLong => "Your message was too long. It has not been sent.",
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            AppError::DecodingRequestFailed
            | AppError::UsersEmailTaken
            | AppError::UsersInvalidName
            | AppError::UsersInvalidEmail
            | AppError::UsersPasswordTooShort
            | AppError::EventsInvalidName
            | AppError::EventsInvalidSchedule
            | AppError::EventsInvalidCapacity
            | AppError::EventsUnknownJudge
            | AppError::ParticipationsInvalidTeamName
            | AppError::SubmissionsMissingGithubLink
            | AppError::SubmissionsMissingDescription
            | AppError::SubmissionsFileTooLarge
            | AppError::ReviewsInvalidRating
            | AppError::ReviewsMissingFeedback
            | AppError::ChatsInvalidRecipient
            | AppError::MessagesEmpty
            | AppError::MessagesTooLong => ErrorKind::Validation,

            AppError::ParticipationsAlreadyJoined => ErrorKind::AlreadyJoined,
            AppError::SubmissionsDuplicate => ErrorKind::DuplicateSubmission,
            AppError::ReviewsDuplicate => ErrorKind::DuplicateReview,
            AppError::EventsFull => ErrorKind::EventFull,
            AppError::EventsClosed | AppError::EventsNotEditable | AppError::SubmissionsClosed => {
                ErrorKind::EventClosed
            }
            AppError::EventsInvalidTransition => ErrorKind::InvalidTransition,

            AppError::Unauthorized
            | AppError::SessionsInvalidCredentials
            | AppError::EventsUnauthorized
            | AppError::ParticipationsUnauthorized
            | AppError::SubmissionsUnauthorized
            | AppError::ReviewsUnauthorized
            | AppError::ChatsUnauthorized => ErrorKind::NotAuthorized,

            AppError::UsersNotFound
            | AppError::SessionsNotFound
            | AppError::EventsNotFound
            | AppError::ParticipationsNotFound
            | AppError::SubmissionsNotFound
            | AppError::ChatsNotFound => ErrorKind::NotFound,

            AppError::Unexpected => ErrorKind::Unexpected,
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::SessionsNotFound | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::SessionsInvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UsersEmailTaken => StatusCode::CONFLICT,
            AppError::SubmissionsFileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => match self.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::AlreadyJoined
                | ErrorKind::DuplicateSubmission
                | ErrorKind::DuplicateReview
                | ErrorKind::EventFull
                | ErrorKind::EventClosed
                | ErrorKind::InvalidTransition => StatusCode::CONFLICT,
                ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_duplicates_and_gating() {
        assert_eq!(
            AppError::ParticipationsAlreadyJoined.kind(),
            ErrorKind::AlreadyJoined
        );
        assert_eq!(
            AppError::SubmissionsDuplicate.kind(),
            ErrorKind::DuplicateSubmission
        );
        assert_eq!(AppError::ReviewsDuplicate.kind(), ErrorKind::DuplicateReview);
        assert_eq!(AppError::EventsFull.kind(), ErrorKind::EventFull);
        assert_eq!(AppError::SubmissionsClosed.kind(), ErrorKind::EventClosed);
        assert_eq!(AppError::ReviewsUnauthorized.kind(), ErrorKind::NotAuthorized);
        assert_eq!(AppError::MessagesEmpty.kind(), ErrorKind::Validation);
    }

    #[test]
    fn http_status_follows_kind() {
        assert_eq!(AppError::EventsFull.http_status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ReviewsInvalidRating.http_status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SessionsNotFound.http_status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Unexpected.http_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_carries_code_and_message() {
        let (status, Json(body)) = AppError::EventsFull.response_parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "code": "events.full",
                "message": "The event has no free spots left.",
            })
        );
    }

    #[test]
    fn foreign_errors_become_unexpected() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(error, AppError::Unexpected);
    }
}
