//! Subscription commands.

use crate::TopicId;
use serde::{Deserialize, Serialize};

/// Kind of subscription change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionCommandType {
    /// Subscribe to an optional topic.
    Add,
    /// Unsubscribe from an optional topic.
    Remove,
}

/// One intended change to the client's optional-topic subscription set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionCommand {
    /// Topic the change applies to.
    pub topic_id: TopicId,
    /// Whether to subscribe or unsubscribe.
    pub command: SubscriptionCommandType,
}

impl SubscriptionCommand {
    /// Creates a subscribe command.
    pub fn add(topic_id: TopicId) -> Self {
        Self {
            topic_id,
            command: SubscriptionCommandType::Add,
        }
    }

    /// Creates an unsubscribe command.
    pub fn remove(topic_id: TopicId) -> Self {
        Self {
            topic_id,
            command: SubscriptionCommandType::Remove,
        }
    }
}
