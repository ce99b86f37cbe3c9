use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, is_unique_violation, unexpected};
use crate::models::sessions::Session;
use crate::models::users::{User, is_valid_email, normalize_email};
use crate::repositories::users;
use crate::usecases::sessions;
use tracing::info;

const MIN_PASSWORD_LENGTH: usize = 8;

#[cfg(not(test))]
const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const BCRYPT_COST: u32 = 4;

pub async fn signup<C: Context>(
    ctx: &C,
    name: &str,
    email: &str,
    password: &str,
) -> ServiceResult<Session> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::UsersInvalidName);
    }
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::UsersInvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::UsersPasswordTooShort);
    }

    let password_hash = bcrypt::hash(password, BCRYPT_COST)?;
    let user = match users::create(ctx, &email, name, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => return Err(AppError::UsersEmailTaken),
        Err(e) => return unexpected(e),
    };
    info!(user_id = user.id, "User signed up");
    sessions::create(ctx, user.id).await
}

pub async fn fetch_one<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<User> {
    match users::fetch_one(ctx, user_id).await {
        Ok(user) => Ok(User::from(user)),
        Err(sqlx::Error::RowNotFound) => Err(AppError::UsersNotFound),
        Err(e) => unexpected(e),
    }
}

/// Resolves emails to users. Emails are normalized first; unknown emails are skipped.
pub async fn fetch_many_by_emails<C: Context>(
    ctx: &C,
    emails: &[String],
) -> ServiceResult<Vec<User>> {
    let emails: Vec<String> = emails.iter().map(|email| normalize_email(email)).collect();
    let users = users::fetch_many_by_emails(ctx, &emails).await?;
    Ok(users.into_iter().map(User::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;

    #[tokio::test]
    async fn signup_normalizes_email_and_opens_a_session() {
        let ctx = TestContext::new().await;
        let session = signup(&ctx, " Ada ", "  Ada@Example.COM", "password123")
            .await
            .unwrap();
        assert_eq!(session.name, "Ada");
        assert_eq!(session.email, "ada@example.com");

        let user = fetch_one(&ctx, session.user_id).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn taken_email_is_rejected_regardless_of_case() {
        let ctx = TestContext::new().await;
        signup(&ctx, "Ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let result = signup(&ctx, "Imposter", "ADA@example.com", "password456").await;
        assert_eq!(result.unwrap_err(), AppError::UsersEmailTaken);
    }

    #[tokio::test]
    async fn signup_validates_input() {
        let ctx = TestContext::new().await;
        assert_eq!(
            signup(&ctx, "", "a@b.c", "password123").await.unwrap_err(),
            AppError::UsersInvalidName
        );
        assert_eq!(
            signup(&ctx, "Ada", "not-an-email", "password123")
                .await
                .unwrap_err(),
            AppError::UsersInvalidEmail
        );
        assert_eq!(
            signup(&ctx, "Ada", "a@b.c", "short").await.unwrap_err(),
            AppError::UsersPasswordTooShort
        );
    }

    #[tokio::test]
    async fn unknown_emails_are_skipped_when_resolving() {
        let ctx = TestContext::new().await;
        let judge = ctx.user("Grace").await;
        let users = fetch_many_by_emails(
            &ctx,
            &["GRACE@example.com".to_owned(), "nobody@example.com".to_owned()],
        )
        .await
        .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_id, judge.user_id);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let ctx = TestContext::new().await;
        assert_eq!(fetch_one(&ctx, 42).await.unwrap_err(), AppError::UsersNotFound);
    }
}
