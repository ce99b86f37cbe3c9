use crate::models::messages::Message;
use futures::Stream;
use hashbrown::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, mpsc};
use tracing::debug;

/// In-process fan-out of newly appended chat messages, keyed by chat id.
///
/// Every subscriber owns an unbounded queue, so a slow reader never loses
/// messages. Channels exist only while they have at least one subscriber.
#[derive(Clone, Default)]
pub struct RealtimeHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    channels: Mutex<HashMap<i64, Channel>>,
    write_locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
    next_subscriber_id: AtomicU64,
}

#[derive(Default)]
struct Channel {
    subscribers: HashMap<u64, mpsc::UnboundedSender<Message>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, chat_id: i64) -> ChatSubscription {
        let subscriber_id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.inner.channels)
            .entry(chat_id)
            .or_default()
            .subscribers
            .insert(subscriber_id, sender);
        debug!(chat_id, subscriber_id, "Subscribed to chat");
        ChatSubscription {
            chat_id,
            subscriber_id,
            receiver,
            hub: self.clone(),
        }
    }

    /// Delivers the message to every live subscriber of the chat.
    /// Returns the number of subscribers it was delivered to.
    pub fn publish(&self, chat_id: i64, message: &Message) -> usize {
        let mut channels = lock(&self.inner.channels);
        let Some(channel) = channels.get_mut(&chat_id) else {
            return 0;
        };
        channel
            .subscribers
            .retain(|_, sender| sender.send(message.clone()).is_ok());
        let delivered = channel.subscribers.len();
        if delivered == 0 {
            channels.remove(&chat_id);
        }
        delivered
    }

    pub fn subscriber_count(&self, chat_id: i64) -> usize {
        lock(&self.inner.channels)
            .get(&chat_id)
            .map_or(0, |channel| channel.subscribers.len())
    }

    pub fn channel_count(&self) -> usize {
        lock(&self.inner.channels).len()
    }

    /// Serializes appends to one chat so that storage order and delivery order agree.
    /// The lock entry lives only while some writer holds or awaits it.
    pub async fn lock_channel(&self, chat_id: i64) -> ChannelWriteGuard {
        let write_lock = lock(&self.inner.write_locks)
            .entry(chat_id)
            .or_default()
            .clone();
        ChannelWriteGuard {
            chat_id,
            guard: Some(write_lock.lock_owned().await),
            hub: self.clone(),
        }
    }

    pub fn write_lock_count(&self) -> usize {
        lock(&self.inner.write_locks).len()
    }

    fn release_write_lock(&self, chat_id: i64) {
        let mut write_locks = lock(&self.inner.write_locks);
        // The map holds one reference; any other belongs to a waiting writer.
        if write_locks
            .get(&chat_id)
            .is_some_and(|write_lock| Arc::strong_count(write_lock) == 1)
        {
            write_locks.remove(&chat_id);
        }
    }

    fn unsubscribe(&self, chat_id: i64, subscriber_id: u64) {
        let mut channels = lock(&self.inner.channels);
        if let Some(channel) = channels.get_mut(&chat_id) {
            channel.subscribers.remove(&subscriber_id);
            if channel.subscribers.is_empty() {
                channels.remove(&chat_id);
            }
        }
        debug!(chat_id, subscriber_id, "Unsubscribed from chat");
    }
}

/// Exclusive append access to one chat, released on drop.
pub struct ChannelWriteGuard {
    chat_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    hub: RealtimeHub,
}

impl Drop for ChannelWriteGuard {
    fn drop(&mut self) {
        // Unlock first so the owned guard gives back its reference to the lock.
        drop(self.guard.take());
        self.hub.release_write_lock(self.chat_id);
    }
}

/// A lazy, infinite stream of messages appended to a chat after subscribing.
/// Dropping it stops delivery and releases the channel slot.
pub struct ChatSubscription {
    chat_id: i64,
    subscriber_id: u64,
    receiver: mpsc::UnboundedReceiver<Message>,
    hub: RealtimeHub,
}

impl ChatSubscription {
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }
}

impl Stream for ChatSubscription {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for ChatSubscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.chat_id, self.subscriber_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures::StreamExt;

    fn message(id: i64, chat_id: i64, content: &str) -> Message {
        Message {
            message_id: id,
            chat_id,
            sender_id: 1,
            sender_name: "Ada".to_owned(),
            content: content.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn delivers_in_publish_order_to_every_subscriber() {
        let hub = RealtimeHub::new();
        let mut first = hub.subscribe(7);
        let mut second = hub.subscribe(7);

        assert_eq!(hub.publish(7, &message(1, 7, "a")), 2);
        assert_eq!(hub.publish(7, &message(2, 7, "b")), 2);

        for subscription in [&mut first, &mut second] {
            assert_eq!(subscription.next().await.unwrap().content, "a");
            assert_eq!(subscription.next().await.unwrap().content, "b");
        }
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let hub = RealtimeHub::new();
        let mut other = hub.subscribe(2);
        hub.publish(1, &message(1, 1, "not for you"));
        hub.publish(2, &message(2, 2, "for you"));
        assert_eq!(other.next().await.unwrap().content, "for you");
    }

    #[test]
    fn dropping_the_last_subscription_releases_the_channel() {
        let hub = RealtimeHub::new();
        let first = hub.subscribe(3);
        let second = hub.subscribe(3);
        assert_eq!(hub.subscriber_count(3), 2);

        drop(first);
        assert_eq!(hub.subscriber_count(3), 1);
        drop(second);
        assert_eq!(hub.channel_count(), 0);
        assert_eq!(hub.publish(3, &message(1, 3, "nobody")), 0);
    }

    #[tokio::test]
    async fn write_locks_are_released_after_the_last_writer() {
        let hub = RealtimeHub::new();
        for chat_id in 0..100 {
            let _guard = hub.lock_channel(chat_id).await;
            assert_eq!(hub.write_lock_count(), 1);
        }
        assert_eq!(hub.write_lock_count(), 0);
    }

    #[tokio::test]
    async fn a_waiting_writer_keeps_the_lock_alive() {
        let hub = RealtimeHub::new();
        let first = hub.lock_channel(5).await;

        let waiter = tokio::spawn({
            let hub = hub.clone();
            async move {
                let _guard = hub.lock_channel(5).await;
                hub.write_lock_count()
            }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        drop(first);

        // The waiter acquired the same entry, so it was not removed under it.
        assert_eq!(waiter.await.unwrap(), 1);
        assert_eq!(hub.write_lock_count(), 0);
    }

    #[tokio::test]
    async fn writers_to_one_chat_are_serialized() {
        let hub = RealtimeHub::new();
        let guard = hub.lock_channel(9).await;
        let contender = tokio::spawn({
            let hub = hub.clone();
            async move {
                let _guard = hub.lock_channel(9).await;
            }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!contender.is_finished());
        drop(guard);
        contender.await.unwrap();
        assert_eq!(hub.write_lock_count(), 0);
    }
}
