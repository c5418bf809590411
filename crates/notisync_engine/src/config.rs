//! Configuration for the notification transport.

use notisync_protocol::SequenceNumber;

/// How a broadcast notification moves its topic's progress marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressPolicy {
    /// The last broadcast in response order sets the marker, even if its
    /// sequence number is lower than an earlier one.
    #[default]
    LastApplied,
    /// The marker only moves forward.
    MaxSeen,
}

impl ProgressPolicy {
    /// Returns the new marker after applying `incoming` to `current`.
    pub fn apply(&self, current: SequenceNumber, incoming: SequenceNumber) -> SequenceNumber {
        match self {
            ProgressPolicy::LastApplied => incoming,
            ProgressPolicy::MaxSeen => current.max(incoming),
        }
    }
}

/// Configuration for a [`crate::NotificationTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Progress update policy.
    pub progress_policy: ProgressPolicy,
    /// Whether to call the store's `persist` after each processed response.
    pub persist_after_response: bool,
}

impl TransportConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the progress update policy.
    #[must_use]
    pub fn with_progress_policy(mut self, policy: ProgressPolicy) -> Self {
        self.progress_policy = policy;
        self
    }

    /// Sets whether to persist the store after each processed response.
    #[must_use]
    pub fn with_persist_after_response(mut self, persist: bool) -> Self {
        self.persist_after_response = persist;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            progress_policy: ProgressPolicy::LastApplied,
            persist_after_response: true,
        }
    }
}
