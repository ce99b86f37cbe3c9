use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::common::realtime::ChatSubscription;
use crate::models::messages::{Message, validate_content};
use crate::models::sessions::Session;
use crate::repositories::messages;
use crate::usecases::chats;
use chrono::Utc;
use tracing::debug;

/// Appends a message to the chat log and delivers it to live subscribers.
pub async fn post<C: Context>(
    ctx: &C,
    session: &Session,
    chat_id: i64,
    content: &str,
) -> ServiceResult<Message> {
    validate_content(content)?;
    chats::fetch_joined(ctx, session, chat_id).await?;

    let content = content.trim();
    // Held until published so that delivery order matches the stored order.
    let _guard = ctx.realtime().lock_channel(chat_id).await;
    let created_at = Utc::now();
    let message_id = messages::create(ctx, chat_id, session.user_id, content, created_at).await?;
    let message = Message {
        message_id,
        chat_id,
        sender_id: session.user_id,
        sender_name: session.name.clone(),
        content: content.to_owned(),
        created_at,
    };
    let delivered = ctx.realtime().publish(chat_id, &message);

    debug!(
        chat_id,
        message_id,
        sender_id = session.user_id,
        delivered,
        "Message posted"
    );
    Ok(message)
}

pub async fn fetch_history<C: Context>(
    ctx: &C,
    session: &Session,
    chat_id: i64,
) -> ServiceResult<Vec<Message>> {
    chats::fetch_joined(ctx, session, chat_id).await?;
    let messages = messages::fetch_history(ctx, chat_id).await?;
    Ok(messages.into_iter().map(Message::from).collect())
}

/// Streams messages posted to the chat from now on. History is not replayed.
pub async fn subscribe<C: Context>(
    ctx: &C,
    session: &Session,
    chat_id: i64,
) -> ServiceResult<ChatSubscription> {
    chats::fetch_joined(ctx, session, chat_id).await?;
    Ok(ctx.realtime().subscribe(chat_id))
}
