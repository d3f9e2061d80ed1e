//! The Message aggregate representing a single chat message in a channel.
//!
//! Messages are immutable after creation: the relay appends them to the
//! channel log and never updates or deletes them.

use super::{MessageId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The payload of a message: exactly one of a text body or an image
/// reference.
///
/// The original document schema carried both `text` and `imageUrl` as
/// optional fields with exactly one expected to be meaningful; the enum
/// makes that invariant structural. Image upload itself is out of scope —
/// the URL is an opaque reference to an already-hosted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// A plain text message.
    Text(String),
    /// A reference to a hosted image.
    Image(String),
}

impl MessageBody {
    /// Returns the text content, if this is a text body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Returns the image URL, if this is an image body.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image(url) => Some(url),
            Self::Text(_) => None,
        }
    }

    /// Returns a human-readable summary for notification bodies.
    ///
    /// Text bodies summarise to their content; image bodies to a fixed
    /// placeholder, since the URL is meaningless in a notification.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Image(_) => "\u{1f4f7} Photo",
        }
    }
}

/// Identity snapshot of a message sender.
///
/// The display name is captured at send time, so later profile renames do
/// not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    user_id: UserId,
    display_name: String,
}

impl SenderProfile {
    /// Creates a sender profile from a user id and display name.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }

    /// Returns the sender's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the sender's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// A message within a channel.
///
/// # Invariants
///
/// - `id` is unique within its channel (enforced by the store on append)
/// - `created_at` is always populated
/// - the body is exactly one of text or image reference (enforced at
///   construction and on deserialisation)
/// - messages cannot be modified after creation
///
/// # Examples
///
/// ```
/// use potluck_relay::chat::domain::{Message, SenderProfile, UserId};
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let sender = SenderProfile::new(UserId::new("uid-1"), "Alice");
/// let message = Message::text(&sender, "hello", &clock);
/// assert_eq!(message.text(), Some("hello"));
/// assert_eq!(message.image_url(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MessageDocument", into = "MessageDocument")]
pub struct Message {
    /// Unique identifier for this message.
    id: MessageId,

    /// The user who sent the message.
    sender_id: UserId,

    /// Display name of the sender, snapshotted at send time.
    sender_name: String,

    /// The message payload.
    body: MessageBody,

    /// When the message was created (sender's clock).
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a text message with a fresh id and the clock's current time.
    #[must_use]
    pub fn text(sender: &SenderProfile, text: impl Into<String>, clock: &impl Clock) -> Self {
        Self::with_parts(MessageId::new(), sender.clone(), MessageBody::Text(text.into()), clock)
    }

    /// Creates an image message with a fresh id and the clock's current time.
    #[must_use]
    pub fn image(sender: &SenderProfile, image_url: impl Into<String>, clock: &impl Clock) -> Self {
        Self::with_parts(
            MessageId::new(),
            sender.clone(),
            MessageBody::Image(image_url.into()),
            clock,
        )
    }

    fn with_parts(id: MessageId, sender: SenderProfile, body: MessageBody, clock: &impl Clock) -> Self {
        let SenderProfile {
            user_id,
            display_name,
        } = sender;
        Self {
            id,
            sender_id: user_id,
            sender_name: display_name,
            body,
            created_at: clock.utc(),
        }
    }

    /// Returns a builder for constructing messages with full control over
    /// the id and body.
    #[must_use]
    pub const fn builder(sender: SenderProfile) -> MessageBuilder {
        MessageBuilder::new(sender)
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the sender's user identifier.
    #[must_use]
    pub const fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    /// Returns the sender's display name snapshot.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// Returns the message body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the text content, if this is a text message.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.body.text()
    }

    /// Returns the image URL, if this is an image message.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.body.image_url()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Builder for constructing messages.
///
/// The relay assigns a fresh [`MessageId`] when none is supplied.
#[derive(Debug)]
pub struct MessageBuilder {
    id: Option<MessageId>,
    sender: SenderProfile,
    body: Option<MessageBody>,
}

impl MessageBuilder {
    /// Creates a new message builder for the given sender.
    #[must_use]
    pub const fn new(sender: SenderProfile) -> Self {
        Self {
            id: None,
            sender,
            body: None,
        }
    }

    /// Sets a specific message id instead of assigning a fresh one.
    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the message body.
    #[must_use]
    pub fn with_body(mut self, body: MessageBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the message, timestamping it with the clock's current time.
    ///
    /// The relay assigns a fresh id when none was set via
    /// [`Self::with_id`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageBodyError::Missing`] if neither a text body nor an
    /// image reference was provided.
    pub fn build(self, clock: &impl Clock) -> Result<Message, MessageBodyError> {
        let body = self.body.ok_or(MessageBodyError::Missing)?;
        Ok(Message::with_parts(
            self.id.unwrap_or_default(),
            self.sender,
            body,
            clock,
        ))
    }
}

/// Errors that can occur when resolving a message body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBodyError {
    /// Neither a text body nor an image reference was provided.
    #[error("message must carry either text or an image reference")]
    Missing,

    /// Both a text body and an image reference were provided.
    #[error("message cannot carry both text and an image reference")]
    Conflicting,
}

/// Wire representation matching the original document schema: camelCase
/// field names, optional `text`/`imageUrl`, and `createdAt` as integer
/// milliseconds since epoch.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDocument {
    id: MessageId,
    sender_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    sender_name: String,
}

impl From<Message> for MessageDocument {
    fn from(message: Message) -> Self {
        let (text, image_url) = match message.body {
            MessageBody::Text(text) => (Some(text), None),
            MessageBody::Image(url) => (None, Some(url)),
        };
        Self {
            id: message.id,
            sender_id: message.sender_id,
            text,
            image_url,
            created_at: message.created_at,
            sender_name: message.sender_name,
        }
    }
}

impl TryFrom<MessageDocument> for Message {
    type Error = MessageBodyError;

    fn try_from(doc: MessageDocument) -> Result<Self, Self::Error> {
        let body = match (doc.text, doc.image_url) {
            (Some(text), None) => MessageBody::Text(text),
            (None, Some(url)) => MessageBody::Image(url),
            (None, None) => return Err(MessageBodyError::Missing),
            (Some(_), Some(_)) => return Err(MessageBodyError::Conflicting),
        };
        Ok(Self {
            id: doc.id,
            sender_id: doc.sender_id,
            sender_name: doc.sender_name,
            body,
            created_at: doc.created_at,
        })
    }
}
