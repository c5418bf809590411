//! Protocol messages for one sync round.

use crate::notification::{Notification, RawNotification};
use crate::subscription::SubscriptionCommand;
use crate::topic::Topic;
use crate::{SequenceNumber, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request sent from client to server.
///
/// Every field is omitted when the client has nothing to report for it, so an
/// absent field is distinguishable from a present but empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Delivery ids of unicast notifications received in the last response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_unicast_ids: Option<Vec<String>>,
    /// Subscription changes not yet confirmed by a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_commands: Option<Vec<SubscriptionCommand>>,
    /// Fingerprint of the topic list the client knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_list_hash: Option<i32>,
    /// Last processed sequence number per tracked topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_progress: Option<BTreeMap<TopicId, SequenceNumber>>,
}

impl SyncRequest {
    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.accepted_unicast_ids.is_none()
            && self.subscription_commands.is_none()
            && self.topic_list_hash.is_none()
            && self.topic_progress.is_none()
    }
}

/// Whether the server's topic catalog changed since the client's fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncResponseStatus {
    /// Catalog unchanged.
    #[default]
    NoDelta,
    /// Catalog changed; the response may carry the new topic list.
    Delta,
}

/// Response sent from server to client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Catalog status.
    #[serde(default)]
    pub status: SyncResponseStatus,
    /// Full topic catalog, if the server sent one.
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
    /// Notifications delivered in this round.
    #[serde(default)]
    pub notifications: Option<Vec<Notification>>,
}

impl SyncResponse {
    /// Creates a response with an unchanged catalog and nothing delivered.
    pub fn no_delta() -> Self {
        Self::default()
    }

    /// Creates a response carrying a new topic catalog.
    pub fn delta(topics: Vec<Topic>) -> Self {
        Self {
            status: SyncResponseStatus::Delta,
            topics: Some(topics),
            notifications: None,
        }
    }

    /// Attaches delivered notifications.
    #[must_use]
    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Returns true if this response replaces the topic catalog.
    pub fn refreshes_catalog(&self) -> bool {
        self.status == SyncResponseStatus::Delta && self.topics.is_some()
    }
}

/// A response as decoded off the wire, before notification kinds are
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSyncResponse {
    /// Catalog status.
    #[serde(default)]
    pub status: SyncResponseStatus,
    /// Full topic catalog, if the server sent one.
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
    /// Notifications in wire shape.
    #[serde(default)]
    pub notifications: Option<Vec<RawNotification>>,
}

impl RawSyncResponse {
    /// Resolves every notification into its broadcast or unicast form.
    ///
    /// Notifications carrying neither a delivery id nor a sequence number are
    /// dropped. The order of the remaining notifications is preserved.
    pub fn into_response(self) -> SyncResponse {
        let notifications = self.notifications.map(|raw| {
            raw.into_iter()
                .filter_map(|n| match Notification::try_from(n) {
                    Ok(notification) => Some(notification),
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping notification");
                        None
                    }
                })
                .collect()
        });

        SyncResponse {
            status: self.status,
            topics: self.topics,
            notifications,
        }
    }
}

impl From<RawSyncResponse> for SyncResponse {
    fn from(raw: RawSyncResponse) -> Self {
        raw.into_response()
    }
}
