//! Error types for protocol decoding.

use crate::TopicId;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while resolving decoded protocol messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A notification carried neither a delivery id nor a sequence number.
    #[error("malformed notification for topic {topic_id}: no delivery id and no sequence number")]
    MalformedNotification {
        /// Topic the notification referenced.
        topic_id: TopicId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProtocolError::MalformedNotification { topic_id: 42 };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("malformed"));
    }
}
