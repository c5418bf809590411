//! Topics and topic list fingerprinting.

use crate::TopicId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fingerprint value meaning "no topic list has been seen yet".
///
/// A computed fingerprint is never equal to this value.
pub const UNSET_TOPIC_LIST_HASH: i32 = 0;

/// How a client is subscribed to a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionType {
    /// Every client is implicitly subscribed.
    Mandatory,
    /// The client must subscribe explicitly.
    Optional,
}

impl SubscriptionType {
    /// Converts to a numeric code.
    pub fn to_code(&self) -> u8 {
        match self {
            SubscriptionType::Mandatory => 1,
            SubscriptionType::Optional => 2,
        }
    }

    /// Converts from a numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SubscriptionType::Mandatory),
            2 => Some(SubscriptionType::Optional),
            _ => None,
        }
    }
}

/// A topic in the server catalog.
///
/// Topics are server-authoritative. A topic's subscription type never
/// changes once the client has observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    /// Topic ID.
    pub id: TopicId,
    /// Subscription type.
    pub subscription_type: SubscriptionType,
}

impl Topic {
    /// Creates a mandatory topic.
    pub fn mandatory(id: TopicId) -> Self {
        Self {
            id,
            subscription_type: SubscriptionType::Mandatory,
        }
    }

    /// Creates an optional topic.
    pub fn optional(id: TopicId) -> Self {
        Self {
            id,
            subscription_type: SubscriptionType::Optional,
        }
    }

    /// Returns true if every client is subscribed to this topic.
    pub fn is_mandatory(&self) -> bool {
        self.subscription_type == SubscriptionType::Mandatory
    }
}

/// Computes the fingerprint of a topic list.
///
/// The fingerprint covers the id and subscription type of every topic and
/// does not depend on the order of `topics`. It is never
/// [`UNSET_TOPIC_LIST_HASH`], including for an empty list.
pub fn topic_list_hash(topics: &[Topic]) -> i32 {
    let mut entries: Vec<(TopicId, u8)> = topics
        .iter()
        .map(|t| (t.id, t.subscription_type.to_code()))
        .collect();
    entries.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update((entries.len() as u64).to_be_bytes());
    for (id, code) in &entries {
        hasher.update(id.to_be_bytes());
        hasher.update([*code]);
    }
    let digest = hasher.finalize();

    match i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) {
        UNSET_TOPIC_LIST_HASH => 1,
        hash => hash,
    }
}
