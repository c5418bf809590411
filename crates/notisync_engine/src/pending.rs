//! Transient state waiting for the next sync round.

use notisync_protocol::SubscriptionCommand;

/// Subscription commands not yet confirmed by a response.
///
/// A new batch replaces the previous one; commands are not merged or
/// validated, so an add and a remove for the same topic both go out.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionIntentQueue {
    commands: Vec<SubscriptionCommand>,
}

impl SubscriptionIntentQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending batch.
    pub fn record(&mut self, commands: Vec<SubscriptionCommand>) {
        self.commands = commands;
    }

    /// Returns the pending batch without clearing it.
    pub fn drain(&self) -> &[SubscriptionCommand] {
        &self.commands
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Returns the number of pending commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if no commands are pending.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Delivery ids of unicast notifications awaiting acknowledgment.
///
/// Only the ids from the most recent response are kept. An id replaced
/// before it was sent is never acknowledged.
#[derive(Debug, Clone, Default)]
pub struct UnicastAckBuffer {
    ids: Vec<String>,
}

impl UnicastAckBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the buffer.
    pub fn replace(&mut self, ids: Vec<String>) {
        self.ids = ids;
    }

    /// Returns a copy of the buffered ids.
    pub fn snapshot(&self) -> Vec<String> {
        self.ids.clone()
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the number of buffered ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
