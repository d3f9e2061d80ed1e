//! Membership tests for [`InMemoryChannelMembership`].

use crate::in_memory::helpers::{channel, membership, runtime};
use potluck_relay::chat::{
    adapters::memory::InMemoryChannelMembership,
    domain::{ChannelId, UserId},
    ports::membership::ChannelMembership,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Tests that a registered member's identifier is listed.
#[rstest]
fn registered_member_is_listed(
    runtime: io::Result<Runtime>,
    membership: InMemoryChannelMembership,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(membership.register_member(&channel, &UserId::new("uid-1"), "alice@example.com"))?;

    let members = rt.block_on(membership.list_members(&channel))?;
    assert!(members.contains("alice@example.com"));
    assert_eq!(members.len(), 1);
    Ok(())
}

/// Tests that re-registering is a no-op keeping the original identifier.
#[rstest]
fn registration_is_idempotent(
    runtime: io::Result<Runtime>,
    membership: InMemoryChannelMembership,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    let user = UserId::new("uid-1");

    rt.block_on(membership.register_member(&channel, &user, "alice@example.com"))?;
    rt.block_on(membership.register_member(&channel, &user, "renamed@example.com"))?;

    let members = rt.block_on(membership.list_members(&channel))?;
    assert_eq!(members.len(), 1);
    assert!(members.contains("alice@example.com"));
    Ok(())
}

/// Tests that a channel with no members lists an empty set.
#[rstest]
fn unknown_channel_lists_no_members(
    runtime: io::Result<Runtime>,
    membership: InMemoryChannelMembership,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    let members = rt.block_on(membership.list_members(&channel))?;
    assert!(members.is_empty());
    Ok(())
}

/// Tests that identifiers come back in a stable sorted order.
#[rstest]
fn members_are_listed_in_sorted_order(
    runtime: io::Result<Runtime>,
    membership: InMemoryChannelMembership,
    channel: ChannelId,
) -> Result<(), TestError> {
    let rt = runtime?;
    rt.block_on(membership.register_member(&channel, &UserId::new("uid-2"), "carol@example.com"))?;
    rt.block_on(membership.register_member(&channel, &UserId::new("uid-1"), "alice@example.com"))?;

    let members = rt.block_on(membership.list_members(&channel))?;
    let ordered: Vec<_> = members.iter().collect();
    assert_eq!(ordered, vec!["alice@example.com", "carol@example.com"]);
    Ok(())
}

/// Tests that membership is tracked per channel.
#[rstest]
fn channels_have_independent_memberships(
    runtime: io::Result<Runtime>,
    membership: InMemoryChannelMembership,
) -> Result<(), TestError> {
    let rt = runtime?;
    let first = ChannelId::new("c1");
    let second = ChannelId::new("c2");

    rt.block_on(membership.register_member(&first, &UserId::new("uid-1"), "alice@example.com"))?;

    assert!(rt.block_on(membership.list_members(&second))?.is_empty());
    Ok(())
}
