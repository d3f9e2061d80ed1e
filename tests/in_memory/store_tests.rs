//! Store tests for [`InMemoryMessageStore`].
//!
//! Covers append, snapshot ordering, duplicate rejection, and channel
//! isolation.

use crate::in_memory::helpers::{channel, runtime, sender, store, text_message_at};
use mockable::DefaultClock;
use potluck_relay::chat::{
    adapters::memory::InMemoryMessageStore,
    domain::{ChannelId, Message, MessageBody, MessageId, SenderProfile},
    error::StoreError,
    ports::store::MessageStore,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Tests that an appended message comes back in the snapshot.
#[rstest]
fn append_then_snapshot_returns_message(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let message = Message::text(&sender, "hello", &DefaultClock);

    let stored_id = rt.block_on(store.append(&channel, message.clone()))?;
    let snapshot = rt.block_on(store.snapshot(&channel))?;

    assert_eq!(stored_id, message.id());
    assert_eq!(snapshot, vec![message]);
    Ok(())
}

/// Tests that a channel with no messages snapshots to an empty vector.
#[rstest]
fn snapshot_of_unknown_channel_is_empty(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    let snapshot = rt.block_on(store.snapshot(&channel))?;
    assert!(snapshot.is_empty());
    Ok(())
}

/// Tests that snapshots are ordered by creation time, not arrival order.
#[rstest]
fn snapshot_orders_by_created_at(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let later = text_message_at(&sender, "world", 1001);
    let earlier = text_message_at(&sender, "hello", 1000);

    rt.block_on(store.append(&channel, later))?;
    rt.block_on(store.append(&channel, earlier))?;

    let snapshot = rt.block_on(store.snapshot(&channel))?;
    let texts: Vec<_> = snapshot.iter().filter_map(Message::text).collect();
    assert_eq!(texts, vec!["hello", "world"]);
    Ok(())
}

/// Tests that messages sharing a timestamp keep insertion order.
#[rstest]
fn equal_timestamps_keep_insertion_order(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let first = text_message_at(&sender, "first", 1000);
    let second = text_message_at(&sender, "second", 1000);

    rt.block_on(store.append(&channel, first))?;
    rt.block_on(store.append(&channel, second))?;

    let snapshot = rt.block_on(store.snapshot(&channel))?;
    let texts: Vec<_> = snapshot.iter().filter_map(Message::text).collect();
    assert_eq!(texts, vec!["first", "second"]);
    Ok(())
}

/// Tests that an append reusing an existing id fails and leaves the
/// original untouched.
#[rstest]
fn duplicate_id_is_rejected_without_overwrite(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    channel: ChannelId,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let id = MessageId::new();
    let original = Message::builder(sender.clone())
        .with_id(id)
        .with_body(MessageBody::Text("original".into()))
        .build(&DefaultClock)?;
    let replacement = Message::builder(sender)
        .with_id(id)
        .with_body(MessageBody::Text("replacement".into()))
        .build(&DefaultClock)?;

    rt.block_on(store.append(&channel, original))?;
    let err = rt
        .block_on(store.append(&channel, replacement))
        .expect_err("duplicate id must be rejected");

    assert!(matches!(err, StoreError::DuplicateMessage(dup) if dup == id));
    let snapshot = rt.block_on(store.snapshot(&channel))?;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.first().and_then(Message::text), Some("original"));
    Ok(())
}

/// Tests that channels do not see each other's messages.
#[rstest]
fn channels_are_isolated(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let first = ChannelId::new("c1");
    let second = ChannelId::new("c2");

    rt.block_on(store.append(&first, Message::text(&sender, "hello", &DefaultClock)))?;

    assert_eq!(store.channel_len(&first), 1);
    assert_eq!(store.channel_len(&second), 0);
    assert!(rt.block_on(store.snapshot(&second))?.is_empty());
    Ok(())
}

/// Tests that the same id may appear in two different channels.
#[rstest]
fn duplicate_detection_is_per_channel(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
    sender: SenderProfile,
) -> Result<(), TestError> {
    let rt = runtime?;
    let id = MessageId::new();
    let build = |text: &str| {
        Message::builder(sender.clone())
            .with_id(id)
            .with_body(MessageBody::Text(text.into()))
            .build(&DefaultClock)
    };

    rt.block_on(store.append(&ChannelId::new("c1"), build("in c1")?))?;
    rt.block_on(store.append(&ChannelId::new("c2"), build("in c2")?))?;

    assert_eq!(store.channel_len(&ChannelId::new("c1")), 1);
    assert_eq!(store.channel_len(&ChannelId::new("c2")), 1);
    Ok(())
}
