//! The `ChatRelay` service: accepts a send request, appends it to the
//! channel log, and fans out a push notification to topic subscribers.

use std::sync::Arc;

use mockable::Clock;
use tokio::task::JoinHandle;

use crate::chat::{
    domain::{ChannelId, Message, MessageBody, MessageBodyError, MessageId, SenderProfile, UserId},
    error::StoreError,
    ports::{
        membership::ChannelMembership,
        store::{MessageFeed, MessageStore},
    },
};
use crate::notify::{
    domain::DeviceToken,
    error::DispatchError,
    ports::dispatcher::NotificationDispatcher,
};
use crate::relay::{
    error::{RelayError, RelayResult},
    retry::RetryPolicy,
};

/// Parameters for a send request.
///
/// Exactly one of text or image reference must be set; the relay rejects
/// requests with neither or both.
///
/// # Examples
///
/// ```
/// use potluck_relay::chat::domain::{ChannelId, SenderProfile, UserId};
/// use potluck_relay::relay::SendParams;
///
/// let sender = SenderProfile::new(UserId::new("uid-1"), "Alice");
/// let params = SendParams::new(ChannelId::new("c1"), sender).with_text("hello");
/// ```
#[derive(Debug, Clone)]
pub struct SendParams {
    /// The channel to send into.
    pub channel: ChannelId,
    /// The sending user's identity snapshot.
    pub sender: SenderProfile,
    /// Text body, if this is a text message.
    pub text: Option<String>,
    /// Hosted image reference, if this is an image message.
    pub image_url: Option<String>,
}

impl SendParams {
    /// Creates send parameters with no body yet.
    #[must_use]
    pub const fn new(channel: ChannelId, sender: SenderProfile) -> Self {
        Self {
            channel,
            sender,
            text: None,
            image_url: None,
        }
    }

    /// Sets the text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    fn into_message(self, clock: &impl Clock) -> RelayResult<(ChannelId, Message)> {
        let body = match (self.text, self.image_url) {
            (Some(text), None) => MessageBody::Text(text),
            (None, Some(url)) => MessageBody::Image(url),
            (None, None) => return Err(RelayError::InvalidMessage(MessageBodyError::Missing)),
            (Some(_), Some(_)) => {
                return Err(RelayError::InvalidMessage(MessageBodyError::Conflicting));
            }
        };
        let message = Message::builder(self.sender)
            .with_body(body)
            .build(clock)
            .map_err(RelayError::InvalidMessage)?;
        Ok((self.channel, message))
    }
}

/// A feed consumer's identity: who joins the membership relation and which
/// device subscribes to the channel's push topic.
#[derive(Debug, Clone)]
pub struct Subscriber {
    user_id: UserId,
    identifier: String,
    device_token: Option<DeviceToken>,
}

impl Subscriber {
    /// Creates a subscriber from a user id and display identifier (email).
    #[must_use]
    pub fn new(user_id: UserId, identifier: impl Into<String>) -> Self {
        Self {
            user_id,
            identifier: identifier.into(),
            device_token: None,
        }
    }

    /// Sets the device's push registration token.
    ///
    /// Without one, feed opens skip topic subscription (the session still
    /// receives live updates through the feed itself).
    #[must_use]
    pub fn with_device_token(mut self, token: DeviceToken) -> Self {
        self.device_token = Some(token);
        self
    }

    /// Returns the subscriber's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the subscriber's display identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Terminal notification state of a send: `NotifyAttempted{Success|Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The push provider accepted the notification.
    Delivered,
    /// Dispatch failed after retries; the message remains stored.
    Failed,
}

/// Handle resolving to the background notification outcome.
///
/// Dropping the handle detaches the dispatch task; it still runs to
/// completion. Await [`NotifyHandle::outcome`] only when the caller cares
/// (tests, diagnostics).
#[derive(Debug)]
pub struct NotifyHandle {
    task: JoinHandle<NotifyOutcome>,
}

impl NotifyHandle {
    /// Waits for the dispatch task and returns its outcome.
    ///
    /// A cancelled or panicked task counts as [`NotifyOutcome::Failed`].
    pub async fn outcome(self) -> NotifyOutcome {
        self.task.await.unwrap_or(NotifyOutcome::Failed)
    }
}

/// Receipt for an accepted send.
#[derive(Debug)]
pub struct SendReceipt {
    /// The id under which the message was stored.
    pub message_id: MessageId,
    /// Handle to the background notification dispatch.
    pub notify: NotifyHandle,
}

/// Service orchestrating the relay pipeline.
///
/// Wires the message log, the membership relation, and the push dispatcher
/// behind the two operations the app uses: [`ChatRelay::send`] and
/// [`ChatRelay::open_feed`].
///
/// # Example
///
/// ```ignore
/// let relay = ChatRelay::new(store, membership, dispatcher, clock);
///
/// let receipt = relay
///     .send(SendParams::new(channel.clone(), sender).with_text("hello"))
///     .await?;
///
/// let mut feed = relay.open_feed(&channel, &subscriber).await?;
/// while let Some(event) = feed.next().await { /* ... */ }
/// ```
pub struct ChatRelay<S, M, D, K>
where
    S: MessageStore + 'static,
    M: ChannelMembership,
    D: NotificationDispatcher + 'static,
    K: Clock + Send + Sync,
{
    store: Arc<S>,
    membership: Arc<M>,
    dispatcher: Arc<D>,
    clock: Arc<K>,
    store_retry: RetryPolicy,
    notify_retry: RetryPolicy,
}

impl<S, M, D, K> ChatRelay<S, M, D, K>
where
    S: MessageStore + 'static,
    M: ChannelMembership,
    D: NotificationDispatcher + 'static,
    K: Clock + Send + Sync,
{
    /// Creates a relay with the default retry policies.
    #[must_use]
    pub fn new(store: Arc<S>, membership: Arc<M>, dispatcher: Arc<D>, clock: Arc<K>) -> Self {
        Self {
            store,
            membership,
            dispatcher,
            clock,
            store_retry: RetryPolicy::new(),
            notify_retry: RetryPolicy::new(),
        }
    }

    /// Overrides the retry policy for store appends.
    #[must_use]
    pub fn with_store_retry(mut self, policy: RetryPolicy) -> Self {
        self.store_retry = policy;
        self
    }

    /// Overrides the retry policy for notification dispatch.
    #[must_use]
    pub fn with_notify_retry(mut self, policy: RetryPolicy) -> Self {
        self.notify_retry = policy;
        self
    }

    /// Sends a message to a channel.
    ///
    /// The send is `Stored` once the append succeeds; only then is the
    /// push fan-out attempted, on a background task so credential exchange
    /// and provider latency never delay the sender. Dispatch failures are
    /// logged and reflected in the receipt's [`NotifyHandle`], never in
    /// this method's result.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidMessage`] if neither or both of text
    /// and image reference are set, and [`RelayError::Store`] if the
    /// append fails after retrying transient unavailability. On append
    /// failure no notification is attempted.
    pub async fn send(&self, params: SendParams) -> RelayResult<SendReceipt> {
        let (channel, message) = params.into_message(self.clock.as_ref())?;

        let message_id = {
            let store = Arc::clone(&self.store);
            let append_channel = channel.clone();
            let append_message = message.clone();
            self.store_retry
                .run("message append", StoreError::is_transient, move || {
                    let attempt_store = Arc::clone(&store);
                    let attempt_channel = append_channel.clone();
                    let attempt_message = append_message.clone();
                    async move { attempt_store.append(&attempt_channel, attempt_message).await }
                })
                .await?
        };

        let notify = self.spawn_notify(channel, &message);

        Ok(SendReceipt { message_id, notify })
    }

    /// Opens a live feed over a channel.
    ///
    /// Pass-through to the store subscription, plus the two side effects
    /// of joining a channel session: membership registration (surfaced on
    /// failure) and push-topic subscription (best-effort, logged). Both
    /// are idempotent and re-issued on every open.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Store`] if the subscription or the membership
    /// registration fails.
    pub async fn open_feed(
        &self,
        channel: &ChannelId,
        subscriber: &Subscriber,
    ) -> RelayResult<MessageFeed> {
        let feed = self.store.subscribe(channel).await?;

        self.membership
            .register_member(channel, &subscriber.user_id, &subscriber.identifier)
            .await?;

        if let Some(device) = subscriber.device_token.clone() {
            let dispatcher = Arc::clone(&self.dispatcher);
            let topic_channel = channel.clone();
            drop(tokio::spawn(async move {
                if let Err(err) = dispatcher.subscribe_topic(&topic_channel, &device).await {
                    tracing::warn!(
                        error = %err,
                        channel = %topic_channel,
                        "push topic subscription failed"
                    );
                }
            }));
        }

        Ok(feed)
    }

    /// Returns the display identifiers of the channel's members.
    ///
    /// Used by the channel's members sheet; an unknown channel yields an
    /// empty set.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Store`] if the membership relation cannot be
    /// reached.
    pub async fn members(
        &self,
        channel: &ChannelId,
    ) -> RelayResult<std::collections::BTreeSet<String>> {
        Ok(self.membership.list_members(channel).await?)
    }

    fn spawn_notify(&self, channel: ChannelId, message: &Message) -> NotifyHandle {
        let dispatcher = Arc::clone(&self.dispatcher);
        let retry = self.notify_retry.clone();
        let sender_name = message.sender_name().to_owned();
        let summary = message.body().summary().to_owned();

        let task = tokio::spawn(async move {
            let result = retry
                .run("notification dispatch", DispatchError::is_transient, || {
                    let attempt_dispatcher = Arc::clone(&dispatcher);
                    let attempt_channel = channel.clone();
                    let attempt_sender = sender_name.clone();
                    let attempt_summary = summary.clone();
                    async move {
                        attempt_dispatcher
                            .notify_channel(&attempt_channel, &attempt_sender, &attempt_summary)
                            .await
                    }
                })
                .await;

            match result {
                Ok(()) => NotifyOutcome::Delivered,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        channel = %channel,
                        "push dispatch failed; message remains stored"
                    );
                    NotifyOutcome::Failed
                }
            }
        });

        NotifyHandle { task }
    }
}
