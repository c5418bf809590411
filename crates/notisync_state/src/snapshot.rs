//! In-memory form of the client state.

use notisync_protocol::{SequenceNumber, TopicId, UNSET_TOPIC_LIST_HASH};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Format version written by [`super::FileStateStore`].
pub const STATE_FORMAT_VERSION: u16 = 1;

/// Everything a store keeps for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Fingerprint of the last known topic list.
    pub topic_list_hash: i32,
    /// Last processed sequence number per tracked topic.
    pub topic_progress: BTreeMap<TopicId, SequenceNumber>,
    /// Optional topics the client subscribes to.
    pub subscriptions: BTreeSet<TopicId>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            topic_list_hash: UNSET_TOPIC_LIST_HASH,
            topic_progress: BTreeMap::new(),
            subscriptions: BTreeSet::new(),
        }
    }
}

/// Versioned envelope stored on disk.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StateFile {
    pub(crate) version: u16,
    pub(crate) state: ClientState,
}
