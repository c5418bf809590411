//! Error types for the notification transport.

use notisync_protocol::ProtocolError;
use notisync_state::StateError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync round.
///
/// The transport itself never fails on well-formed input; these errors come
/// from its collaborators and are passed through unchanged.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The state store failed.
    #[error("state store error: {0}")]
    State(#[from] StateError),

    /// The channel failed to exchange a round.
    #[error("channel error: {message}")]
    Channel {
        /// Error message.
        message: String,
        /// Whether the round can be retried.
        retryable: bool,
    },

    /// The channel received a message it could not resolve.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SyncError {
    /// Creates a retryable channel error.
    pub fn channel_retryable(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable channel error.
    pub fn channel_fatal(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if the surrounding transport may retry the round.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Channel { retryable, .. } => *retryable,
            SyncError::State(StateError::Unavailable(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::channel_retryable("connection lost").is_retryable());
        assert!(!SyncError::channel_fatal("bad certificate").is_retryable());
        assert!(SyncError::State(StateError::Unavailable("busy".into())).is_retryable());
        assert!(!SyncError::State(StateError::Corrupted("bad".into())).is_retryable());
        assert!(!SyncError::Protocol(ProtocolError::MalformedNotification { topic_id: 1 })
            .is_retryable());
    }

    #[test]
    fn error_display() {
        let err = SyncError::channel_fatal("refused");
        assert_eq!(err.to_string(), "channel error: refused");

        let err: SyncError = StateError::Unavailable("disk".into()).into();
        assert!(err.to_string().contains("disk"));
    }
}
