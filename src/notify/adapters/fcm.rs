//! FCM v1 HTTP adapter for the [`NotificationDispatcher`] port.
//!
//! Sends go to `POST <send base>/v1/projects/{project}/messages:send` with
//! a bearer credential; topic subscriptions go to the provider's
//! registration endpoint. Both base URLs are configurable so tests can
//! point the adapter at a local server.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::chat::domain::ChannelId;
use crate::notify::{
    domain::{DeviceToken, PushNotification, TopicName},
    error::DispatchError,
    ports::{
        dispatcher::{DispatchResult, NotificationDispatcher},
        token::AccessTokenSource,
    },
};

/// Default base URL of the push send API.
const DEFAULT_SEND_BASE: &str = "https://fcm.googleapis.com";

/// Default base URL of the instance-id (topic relations) API.
const DEFAULT_TOPIC_BASE: &str = "https://iid.googleapis.com";

/// Deployment configuration for the FCM adapter.
#[derive(Debug, Clone)]
pub struct FcmConfig {
    project_id: String,
    send_base: String,
    topic_base: String,
}

impl FcmConfig {
    /// Creates a configuration for a cloud project with the default
    /// provider endpoints.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            send_base: DEFAULT_SEND_BASE.to_owned(),
            topic_base: DEFAULT_TOPIC_BASE.to_owned(),
        }
    }

    /// Overrides the send API base URL.
    #[must_use]
    pub fn with_send_base(mut self, base: impl Into<String>) -> Self {
        self.send_base = base.into();
        self
    }

    /// Overrides the topic-relations API base URL.
    #[must_use]
    pub fn with_topic_base(mut self, base: impl Into<String>) -> Self {
        self.topic_base = base.into();
        self
    }

    /// Returns the cloud project id.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.send_base, self.project_id
        )
    }

    fn topic_batch_add_url(&self) -> String {
        format!("{}/iid/v1:batchAdd", self.topic_base)
    }
}

/// Send request body: `{"message":{"topic":..,"notification":{..}}}`.
#[derive(Serialize)]
struct SendRequest<'a> {
    message: TopicMessage<'a>,
}

#[derive(Serialize)]
struct TopicMessage<'a> {
    topic: &'a str,
    notification: NotificationBody<'a>,
}

#[derive(Serialize)]
struct NotificationBody<'a> {
    title: &'a str,
    body: &'a str,
}

/// Topic-relations request body for subscribing registration tokens.
#[derive(Serialize)]
struct TopicBatchAdd<'a> {
    to: String,
    registration_tokens: [&'a str; 1],
}

fn send_payload<'a>(topic: &'a TopicName, push: &'a PushNotification) -> SendRequest<'a> {
    SendRequest {
        message: TopicMessage {
            topic: topic.as_str(),
            notification: NotificationBody {
                title: push.title(),
                body: push.body(),
            },
        },
    }
}

async fn check_status(response: reqwest::Response) -> DispatchResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(DispatchError::Rejected {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    })
}

/// FCM v1 implementation of [`NotificationDispatcher`].
///
/// Bearer credentials come from the injected [`AccessTokenSource`]; wrap
/// the live source in a cache so sends do not pay a token exchange each.
pub struct FcmDispatcher<T>
where
    T: AccessTokenSource,
{
    config: FcmConfig,
    tokens: Arc<T>,
    http: reqwest::Client,
}

impl<T> FcmDispatcher<T>
where
    T: AccessTokenSource,
{
    /// Creates a dispatcher for the configured project.
    #[must_use]
    pub fn new(config: FcmConfig, tokens: Arc<T>) -> Self {
        Self {
            config,
            tokens,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl<T> NotificationDispatcher for FcmDispatcher<T>
where
    T: AccessTokenSource,
{
    async fn notify_channel(
        &self,
        channel: &ChannelId,
        sender_name: &str,
        body: &str,
    ) -> DispatchResult<()> {
        let token = self.tokens.access_token().await?;
        let topic = TopicName::for_channel(channel);
        let push = PushNotification::for_channel_message(channel, sender_name, body);

        let response = self
            .http
            .post(self.config.send_url())
            .bearer_auth(token.secret())
            .json(&send_payload(&topic, &push))
            .send()
            .await?;

        check_status(response).await
    }

    async fn subscribe_topic(
        &self,
        channel: &ChannelId,
        device: &DeviceToken,
    ) -> DispatchResult<()> {
        let token = self.tokens.access_token().await?;
        let topic = TopicName::for_channel(channel);

        let response = self
            .http
            .post(self.config.topic_batch_add_url())
            .bearer_auth(token.secret())
            .json(&TopicBatchAdd {
                to: format!("/topics/{topic}"),
                registration_tokens: [device.as_str()],
            })
            .send()
            .await?;

        check_status(response).await
    }
}
