//! Channel abstraction for exchanging one sync round.

use crate::error::{SyncError, SyncResult};
use notisync_protocol::{SyncRequest, SyncResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// A sync channel carries one request to the server and returns its
/// response.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, persistent sockets, mock for testing, etc.).
/// Encoding, channel selection and retries belong to the implementation.
pub trait SyncChannel: Send + Sync {
    /// Sends a request and waits for the matching response.
    fn exchange(&self, request: &SyncRequest) -> SyncResult<SyncResponse>;

    /// Checks if the channel is connected.
    fn is_connected(&self) -> bool;
}

/// A mock channel for testing.
///
/// Responses are served in the order they were queued. Every request that
/// reaches the channel is recorded.
#[derive(Debug)]
pub struct MockChannel {
    connected: AtomicBool,
    responses: Mutex<VecDeque<SyncResponse>>,
    requests: Mutex<Vec<SyncRequest>>,
}

impl MockChannel {
    /// Creates a new connected mock channel with no queued responses.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a response.
    pub fn push_response(&self, response: SyncResponse) {
        self.responses.lock().push_back(response);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().clone()
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncChannel for MockChannel {
    fn exchange(&self, request: &SyncRequest) -> SyncResult<SyncResponse> {
        if !self.is_connected() {
            return Err(SyncError::channel_retryable("not connected"));
        }
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| SyncError::channel_fatal("no mock response queued"))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
