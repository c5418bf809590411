//! In-memory state store for testing.

use crate::backend::ClientStateStorage;
use crate::error::StateResult;
use crate::snapshot::ClientState;
use notisync_protocol::{SequenceNumber, TopicId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// An in-memory state store.
///
/// Suitable for unit tests, integration tests and clients that do not need
/// to remember their progress across restarts.
///
/// # Example
///
/// ```rust
/// use notisync_state::{ClientStateStorage, MemoryStateStore};
/// use std::collections::BTreeMap;
///
/// let store = MemoryStateStore::new();
/// store.set_topic_progress(BTreeMap::from([(1, 5)])).unwrap();
/// assert_eq!(store.topic_progress().unwrap()[&1], 5);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: RwLock<ClientState>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing state.
    #[must_use]
    pub fn with_state(state: ClientState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Returns a copy of the stored state.
    #[must_use]
    pub fn state(&self) -> ClientState {
        self.state.read().clone()
    }

    /// Adds an optional topic to the subscription set.
    pub fn subscribe(&self, topic_id: TopicId) {
        self.state.write().subscriptions.insert(topic_id);
    }

    /// Removes an optional topic from the subscription set.
    pub fn unsubscribe(&self, topic_id: TopicId) {
        self.state.write().subscriptions.remove(&topic_id);
    }

    /// Returns the subscription set.
    #[must_use]
    pub fn subscriptions(&self) -> BTreeSet<TopicId> {
        self.state.read().subscriptions.clone()
    }
}

impl ClientStateStorage for MemoryStateStore {
    fn topic_progress(&self) -> StateResult<BTreeMap<TopicId, SequenceNumber>> {
        Ok(self.state.read().topic_progress.clone())
    }

    fn set_topic_progress(&self, progress: BTreeMap<TopicId, SequenceNumber>) -> StateResult<()> {
        self.state.write().topic_progress = progress;
        Ok(())
    }

    fn topic_list_hash(&self) -> StateResult<i32> {
        Ok(self.state.read().topic_list_hash)
    }

    fn set_topic_list_hash(&self, hash: i32) -> StateResult<()> {
        self.state.write().topic_list_hash = hash;
        Ok(())
    }

    fn is_subscribed(&self, topic_id: TopicId) -> StateResult<bool> {
        Ok(self.state.read().subscriptions.contains(&topic_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_is_empty() {
        let store = MemoryStateStore::new();
        assert!(store.topic_progress().unwrap().is_empty());
        assert_eq!(store.topic_list_hash().unwrap(), 0);
        assert!(!store.is_subscribed(1).unwrap());
    }

    #[test]
    fn subscription_membership() {
        let store = MemoryStateStore::new();
        store.subscribe(4);
        store.subscribe(9);
        assert!(store.is_subscribed(4).unwrap());

        store.unsubscribe(4);
        assert!(!store.is_subscribed(4).unwrap());
        assert_eq!(store.subscriptions(), BTreeSet::from([9]));
    }

    #[test]
    fn progress_and_hash_overwrite() {
        let store = MemoryStateStore::new();
        store.set_topic_progress(BTreeMap::from([(1, 1), (2, 2)])).unwrap();
        store.set_topic_progress(BTreeMap::from([(3, 0)])).unwrap();
        assert_eq!(store.topic_progress().unwrap(), BTreeMap::from([(3, 0)]));

        store.set_topic_list_hash(-77).unwrap();
        assert_eq!(store.topic_list_hash().unwrap(), -77);
        assert!(store.persist().is_ok());
    }

    #[test]
    fn with_state() {
        let state = ClientState {
            topic_list_hash: 5,
            topic_progress: BTreeMap::from([(2, 8)]),
            subscriptions: BTreeSet::from([2]),
        };
        let store = MemoryStateStore::with_state(state.clone());
        assert_eq!(store.state(), state);
    }
}
