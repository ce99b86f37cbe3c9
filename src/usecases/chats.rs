use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, is_unique_violation, unexpected};
use crate::models::chats::{Chat, direct_key};
use crate::models::sessions::Session;
use crate::repositories::chats;
use crate::usecases::users;
use tracing::info;

pub async fn fetch_one<C: Context>(ctx: &C, chat_id: i64) -> ServiceResult<Chat> {
    match chats::fetch_one(ctx, chat_id).await? {
        Some(chat) => Chat::try_from(chat),
        None => Err(AppError::ChatsNotFound),
    }
}

/// Fetches a chat the caller is a member of.
pub async fn fetch_joined<C: Context>(
    ctx: &C,
    session: &Session,
    chat_id: i64,
) -> ServiceResult<Chat> {
    let chat = fetch_one(ctx, chat_id).await?;
    if !chats::is_member(ctx, chat_id, session.user_id).await? {
        return Err(AppError::ChatsUnauthorized);
    }
    Ok(chat)
}

pub async fn fetch_mine<C: Context>(ctx: &C, session: &Session) -> ServiceResult<Vec<Chat>> {
    chats::fetch_by_member(ctx, session.user_id)
        .await?
        .into_iter()
        .map(Chat::try_from)
        .collect()
}

/// Returns the direct chat between the caller and another user, creating it on first use.
pub async fn open_direct<C: Context>(
    ctx: &C,
    session: &Session,
    other_user_id: i64,
) -> ServiceResult<Chat> {
    if other_user_id == session.user_id {
        return Err(AppError::ChatsInvalidRecipient);
    }
    users::fetch_one(ctx, other_user_id).await?;

    let key = direct_key(session.user_id, other_user_id);
    if let Some(chat) = chats::fetch_one_by_direct_key(ctx, &key).await? {
        return Chat::try_from(chat);
    }

    // The chat is only visible once both members are in it.
    let mut tx = ctx.db().begin().await?;
    let chat_id = match chats::create_direct_chat(&mut tx, &key).await {
        Ok(chat_id) => chat_id,
        // The other user opened it at the same time.
        Err(e) if is_unique_violation(&e) => {
            drop(tx);
            return match chats::fetch_one_by_direct_key(ctx, &key).await? {
                Some(chat) => Chat::try_from(chat),
                None => unexpected(e),
            };
        }
        Err(e) => return unexpected(e),
    };
    chats::add_member(&mut tx, chat_id, session.user_id).await?;
    chats::add_member(&mut tx, chat_id, other_user_id).await?;
    tx.commit().await?;

    info!(
        chat_id,
        user_id = session.user_id,
        other_user_id,
        "Direct chat opened"
    );
    fetch_one(ctx, chat_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::models::chats::ChatType;
    use crate::usecases::{events, messages};
    use futures::future::join_all;

    #[tokio::test]
    async fn direct_chat_is_shared_by_the_pair() {
        let ctx = TestContext::new().await;
        let ada = ctx.user("Ada").await;
        let grace = ctx.user("Grace").await;

        let opened = open_direct(&ctx, &ada, grace.user_id).await.unwrap();
        assert_eq!(opened.chat_type, ChatType::Direct);
        let reopened = open_direct(&ctx, &grace, ada.user_id).await.unwrap();
        assert_eq!(opened.chat_id, reopened.chat_id);

        for user in [&ada, &grace] {
            assert_eq!(
                fetch_joined(&ctx, user, opened.chat_id)
                    .await
                    .unwrap()
                    .chat_id,
                opened.chat_id
            );
        }
        let outsider = ctx.user("Linus").await;
        assert_eq!(
            fetch_joined(&ctx, &outsider, opened.chat_id)
                .await
                .unwrap_err(),
            AppError::ChatsUnauthorized
        );
    }

    #[tokio::test]
    async fn a_failed_open_leaves_no_memberless_chat() {
        let ctx = TestContext::new().await;
        let ada = ctx.user("Ada").await;
        let grace = ctx.user("Grace").await;
        sqlx::query(
            "CREATE TRIGGER reject_members BEFORE INSERT ON chat_members \
             BEGIN SELECT RAISE(ABORT, 'members unavailable'); END",
        )
        .execute(&ctx.db)
        .await
        .unwrap();

        assert_eq!(
            open_direct(&ctx, &ada, grace.user_id).await.unwrap_err(),
            AppError::Unexpected
        );
        let key = direct_key(ada.user_id, grace.user_id);
        assert!(
            chats::fetch_one_by_direct_key(&ctx, &key)
                .await
                .unwrap()
                .is_none()
        );

        sqlx::query("DROP TRIGGER reject_members")
            .execute(&ctx.db)
            .await
            .unwrap();
        let chat = open_direct(&ctx, &grace, ada.user_id).await.unwrap();
        for user in [&ada, &grace] {
            fetch_joined(&ctx, user, chat.chat_id).await.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn both_sides_opening_at_once_can_post_immediately() {
        let ctx = TestContext::file_backed(4).await;
        let ada = ctx.user("Ada").await;
        let grace = ctx.user("Grace").await;

        let open_and_post = |sender: &Session, recipient: i64| {
            let ctx = &ctx;
            let sender = sender.clone();
            async move {
                let chat = open_direct(ctx, &sender, recipient).await?;
                messages::post(ctx, &sender, chat.chat_id, "hello").await?;
                ServiceResult::Ok(chat.chat_id)
            }
        };
        let results = join_all([
            open_and_post(&ada, grace.user_id),
            open_and_post(&grace, ada.user_id),
        ])
        .await;

        let chat_ids: Vec<i64> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(chat_ids[0], chat_ids[1]);
        let history = messages::fetch_history(&ctx, &ada, chat_ids[0]).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn direct_chat_needs_another_existing_user() {
        let ctx = TestContext::new().await;
        let ada = ctx.user("Ada").await;
        assert_eq!(
            open_direct(&ctx, &ada, ada.user_id).await.unwrap_err(),
            AppError::ChatsInvalidRecipient
        );
        assert_eq!(
            open_direct(&ctx, &ada, 999).await.unwrap_err(),
            AppError::UsersNotFound
        );
    }

    #[tokio::test]
    async fn my_chats_include_event_and_direct_chats() {
        let ctx = TestContext::new().await;
        let host = ctx.user("Hopper").await;
        let ada = ctx.user("Ada").await;
        let event = ctx.event(&host, &[], 10).await;
        events::join(&ctx, &ada, event.event_id, "Team").await.unwrap();
        open_direct(&ctx, &ada, host.user_id).await.unwrap();

        let chats = fetch_mine(&ctx, &ada).await.unwrap();
        assert_eq!(chats.len(), 2);
        let event_chat = chats
            .iter()
            .find(|chat| chat.chat_type == ChatType::Event)
            .unwrap();
        assert_eq!(event_chat.event_id, Some(event.event_id));
        assert_eq!(event_chat.event_name.as_deref(), Some(event.name.as_str()));
        assert_eq!(
            fetch_one(&ctx, 999).await.unwrap_err(),
            AppError::ChatsNotFound
        );
    }
}
