//! Live feed tests for [`InMemoryMessageStore`].
//!
//! Covers snapshot-then-live delivery, multiple consumers, closing, and
//! lag cancellation.

use crate::in_memory::helpers::{channel, runtime, sender, store};
use mockable::DefaultClock;
use potluck_relay::chat::{
    adapters::memory::InMemoryMessageStore,
    domain::{ChannelId, Message, SenderProfile},
    error::FeedError,
    ports::store::{FeedEvent, MessageStore},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

type TestError = Box<dyn std::error::Error + Send + Sync>;

fn expect_text(event: Option<FeedEvent>) -> String {
    match event {
        Some(FeedEvent::Message(message)) => {
            message.text().expect("text message").to_owned()
        }
        other => panic!("expected message event, got {other:?}"),
    }
}

/// Tests that a feed delivers the existing snapshot before live updates.
#[rstest]
fn feed_delivers_snapshot_then_live_updates(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(async {
        store
            .append(&channel, Message::text(&sender, "backlog", &DefaultClock))
            .await?;

        let mut feed = store.subscribe(&channel).await?;
        assert_eq!(expect_text(feed.next().await), "backlog");

        store
            .append(&channel, Message::text(&sender, "live", &DefaultClock))
            .await?;
        assert_eq!(expect_text(feed.next().await), "live");

        Ok::<(), TestError>(())
    })?;
    Ok(())
}

/// Tests that a subscription to an empty channel sees only live appends.
#[rstest]
fn feed_on_empty_channel_sees_live_appends(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(async {
        let mut feed = store.subscribe(&channel).await?;

        store
            .append(&channel, Message::text(&sender, "first live", &DefaultClock))
            .await?;
        assert_eq!(expect_text(feed.next().await), "first live");

        Ok::<(), TestError>(())
    })?;
    Ok(())
}

/// Tests that every open feed observes the same appends.
#[rstest]
fn multiple_feeds_all_observe_appends(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(async {
        let mut first = store.subscribe(&channel).await?;
        let mut second = store.subscribe(&channel).await?;

        store
            .append(&channel, Message::text(&sender, "shared", &DefaultClock))
            .await?;

        assert_eq!(expect_text(first.next().await), "shared");
        assert_eq!(expect_text(second.next().await), "shared");

        Ok::<(), TestError>(())
    })?;
    Ok(())
}

/// Tests that closing a feed ends it and discards pending backlog.
#[rstest]
fn closed_feed_yields_nothing(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(async {
        store
            .append(&channel, Message::text(&sender, "backlog", &DefaultClock))
            .await?;

        let mut feed = store.subscribe(&channel).await?;
        feed.close();

        assert!(feed.is_closed());
        assert!(feed.next().await.is_none());

        Ok::<(), TestError>(())
    })?;
    Ok(())
}

/// Tests that closing twice is safe.
#[rstest]
fn close_is_idempotent(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(async {
        let mut feed = store.subscribe(&channel).await?;
        feed.close();
        feed.close();
        assert!(feed.is_closed());
        Ok::<(), TestError>(())
    })?;
    Ok(())
}

/// Tests that a consumer overrunning its update buffer is cancelled as
/// lagged and the feed terminates.
#[rstest]
fn lagging_feed_is_cancelled(
    runtime: io::Result<Runtime>,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let store = InMemoryMessageStore::with_update_capacity(1);
    rt.block_on(async {
        let mut feed = store.subscribe(&channel).await?;

        for text in ["one", "two", "three"] {
            store
                .append(&channel, Message::text(&sender, text, &DefaultClock))
                .await?;
        }

        match feed.next().await {
            Some(FeedEvent::Cancelled(FeedError::Lagged { missed })) => {
                assert!(missed > 0);
            }
            other => panic!("expected lag cancellation, got {other:?}"),
        }
        assert!(feed.is_closed());
        assert!(feed.next().await.is_none());

        Ok::<(), TestError>(())
    })?;
    Ok(())
}
