//! Storage contract consumed by the sync transport.

use crate::error::StateResult;
use notisync_protocol::{SequenceNumber, TopicId};
use std::collections::BTreeMap;

/// Durable record of the topic catalog fingerprint, per-topic delivery
/// progress and optional-topic subscription membership.
///
/// The sync transport reads all of it and writes only progress and the
/// fingerprint. How subscriptions are added or removed is up to the store.
///
/// # Invariants
///
/// - A fingerprint of `0` means no topic list has been seen
/// - `set_*` calls are visible to subsequent reads on any thread
/// - Implementations must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::MemoryStateStore`] - For testing
/// - [`super::FileStateStore`] - For persistent state
pub trait ClientStateStorage: Send + Sync {
    /// Returns the last processed sequence number of every tracked topic.
    fn topic_progress(&self) -> StateResult<BTreeMap<TopicId, SequenceNumber>>;

    /// Replaces the progress map.
    fn set_topic_progress(&self, progress: BTreeMap<TopicId, SequenceNumber>) -> StateResult<()>;

    /// Returns the fingerprint of the last known topic list.
    fn topic_list_hash(&self) -> StateResult<i32>;

    /// Stores a new topic list fingerprint.
    fn set_topic_list_hash(&self, hash: i32) -> StateResult<()>;

    /// Returns true if the client currently subscribes to the optional topic.
    fn is_subscribed(&self, topic_id: TopicId) -> StateResult<bool>;

    /// Flushes pending writes to durable media.
    ///
    /// The default implementation does nothing.
    fn persist(&self) -> StateResult<()> {
        Ok(())
    }
}
