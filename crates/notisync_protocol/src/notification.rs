//! Notifications delivered in a sync response.

use crate::error::{ProtocolError, ProtocolResult};
use crate::{SequenceNumber, TopicId};
use serde::{Deserialize, Serialize};

/// A notification received from the server.
///
/// Broadcast notifications go to every subscriber of a topic and are ordered
/// by a per-topic sequence number. Unicast notifications are addressed to this
/// client only and are acknowledged by their delivery id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Notification delivered to all subscribers of a topic.
    Broadcast {
        /// Topic ID.
        topic_id: TopicId,
        /// Position in the topic's delivery order.
        sequence_number: SequenceNumber,
        /// Opaque application payload.
        #[serde(default)]
        body: Vec<u8>,
    },
    /// Notification addressed to this client.
    Unicast {
        /// Topic ID.
        topic_id: TopicId,
        /// Server-assigned delivery id, echoed back as an acknowledgment.
        delivery_id: String,
        /// Opaque application payload.
        #[serde(default)]
        body: Vec<u8>,
    },
}

impl Notification {
    /// Creates a broadcast notification with an empty body.
    pub fn broadcast(topic_id: TopicId, sequence_number: SequenceNumber) -> Self {
        Notification::Broadcast {
            topic_id,
            sequence_number,
            body: Vec::new(),
        }
    }

    /// Creates a unicast notification with an empty body.
    pub fn unicast(topic_id: TopicId, delivery_id: impl Into<String>) -> Self {
        Notification::Unicast {
            topic_id,
            delivery_id: delivery_id.into(),
            body: Vec::new(),
        }
    }

    /// Replaces the payload.
    #[must_use]
    pub fn with_body(mut self, payload: impl Into<Vec<u8>>) -> Self {
        match &mut self {
            Notification::Broadcast { body, .. } | Notification::Unicast { body, .. } => {
                *body = payload.into();
            }
        }
        self
    }

    /// Returns the topic this notification belongs to.
    pub fn topic_id(&self) -> TopicId {
        match self {
            Notification::Broadcast { topic_id, .. } | Notification::Unicast { topic_id, .. } => {
                *topic_id
            }
        }
    }

    /// Returns the payload.
    pub fn body(&self) -> &[u8] {
        match self {
            Notification::Broadcast { body, .. } | Notification::Unicast { body, .. } => body,
        }
    }

    /// Returns true for unicast notifications.
    pub fn is_unicast(&self) -> bool {
        matches!(self, Notification::Unicast { .. })
    }
}

/// A notification as decoded off the wire, before its kind is resolved.
///
/// The wire shape distinguishes unicast from broadcast by field presence:
/// a delivery id marks a unicast notification, otherwise the sequence number
/// places it in its topic's broadcast order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    /// Topic ID.
    pub topic_id: TopicId,
    /// Sequence number, present for broadcasts.
    #[serde(default)]
    pub sequence_number: Option<SequenceNumber>,
    /// Delivery id, present for unicasts.
    #[serde(default)]
    pub delivery_id: Option<String>,
    /// Opaque application payload.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl TryFrom<RawNotification> for Notification {
    type Error = ProtocolError;

    fn try_from(raw: RawNotification) -> ProtocolResult<Self> {
        match (raw.delivery_id, raw.sequence_number) {
            (Some(delivery_id), _) => Ok(Notification::Unicast {
                topic_id: raw.topic_id,
                delivery_id,
                body: raw.body,
            }),
            (None, Some(sequence_number)) => Ok(Notification::Broadcast {
                topic_id: raw.topic_id,
                sequence_number,
                body: raw.body,
            }),
            (None, None) => Err(ProtocolError::MalformedNotification {
                topic_id: raw.topic_id,
            }),
        }
    }
}

impl From<Notification> for RawNotification {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Broadcast {
                topic_id,
                sequence_number,
                body,
            } => RawNotification {
                topic_id,
                sequence_number: Some(sequence_number),
                delivery_id: None,
                body,
            },
            Notification::Unicast {
                topic_id,
                delivery_id,
                body,
            } => RawNotification {
                topic_id,
                sequence_number: None,
                delivery_id: Some(delivery_id),
                body,
            },
        }
    }
}
