//! Notification sync transport.

use crate::builder::build_request;
use crate::channel::SyncChannel;
use crate::config::TransportConfig;
use crate::error::SyncResult;
use crate::pending::{SubscriptionIntentQueue, UnicastAckBuffer};
use crate::processor::{ResponseProcessor, SyncRoundResult};
use notisync_protocol::{RawSyncResponse, SubscriptionCommand, SyncRequest, SyncResponse};
use notisync_state::ClientStateStorage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Cumulative statistics about processed rounds.
#[derive(Debug, Clone, Default)]
pub struct TransportStats {
    /// Total number of requests built.
    pub requests_built: u64,
    /// Total number of responses processed.
    pub responses_processed: u64,
    /// Total number of topic catalog refreshes.
    pub catalog_refreshes: u64,
    /// Total number of broadcasts applied to a tracked topic.
    pub broadcasts_applied: u64,
    /// Total number of broadcasts dropped for untracked topics.
    pub broadcasts_dropped: u64,
    /// Total number of unicast delivery ids queued for acknowledgment.
    pub unicasts_accepted: u64,
    /// Time the last response was processed.
    pub last_response_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Everything guarded by the transport's lock.
#[derive(Debug, Default)]
struct Pending {
    intents: SubscriptionIntentQueue,
    acks: UnicastAckBuffer,
    stats: TransportStats,
}

/// Client side of the notification sync protocol.
///
/// The transport turns pending subscription changes, unacknowledged unicast
/// deliveries and the stored catalog state into a [`SyncRequest`], and folds
/// each [`SyncResponse`] back into the store.
///
/// # Thread Safety
///
/// Subscription changes usually arrive on an application thread while
/// responses arrive on a network thread. All three entry points take the same
/// lock, and store access happens under it, so a request always reflects one
/// consistent state and a response is folded as a single step.
pub struct NotificationTransport<S: ClientStateStorage> {
    config: TransportConfig,
    store: Arc<S>,
    pending: Mutex<Pending>,
}

impl<S: ClientStateStorage> NotificationTransport<S> {
    /// Creates a transport with the default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(TransportConfig::default(), store)
    }

    /// Creates a transport with the given configuration.
    pub fn with_config(config: TransportConfig, store: Arc<S>) -> Self {
        Self {
            config,
            store,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Returns the state store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Records the subscription changes to report in the next request.
    ///
    /// Replaces any batch recorded since the last processed response.
    pub fn on_subscription_changed(&self, commands: Vec<SubscriptionCommand>) {
        debug!(commands = commands.len(), "subscription intent recorded");
        self.pending.lock().intents.record(commands);
    }

    /// Builds the request for the next sync round.
    ///
    /// Building has no side effects on the sync state and may be repeated.
    pub fn create_sync_request(&self) -> SyncResult<SyncRequest> {
        let mut pending = self.pending.lock();
        let Pending {
            intents,
            acks,
            stats,
        } = &mut *pending;

        match build_request(&*self.store, intents, acks) {
            Ok(request) => {
                stats.requests_built += 1;
                Ok(request)
            }
            Err(e) => {
                stats.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Folds a received response into the client state.
    ///
    /// Responses must be passed in the order they were received.
    pub fn on_sync_response_received(&self, response: SyncResponse) -> SyncResult<SyncRoundResult> {
        let mut pending = self.pending.lock();
        let Pending {
            intents,
            acks,
            stats,
        } = &mut *pending;

        let processor = ResponseProcessor::new(&*self.store, &self.config);
        match processor.process(response, intents, acks) {
            Ok(result) => {
                stats.responses_processed += 1;
                stats.catalog_refreshes += u64::from(result.catalog_refreshed);
                stats.broadcasts_applied += result.applied;
                stats.broadcasts_dropped += result.dropped;
                stats.unicasts_accepted += result.accepted_unicast;
                stats.last_response_time = Some(Instant::now());
                stats.last_error = None;
                debug!(
                    catalog_refreshed = result.catalog_refreshed,
                    applied = result.applied,
                    dropped = result.dropped,
                    unicast = result.accepted_unicast,
                    "sync response processed"
                );
                Ok(result)
            }
            Err(e) => {
                stats.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Resolves a response in wire shape and folds it into the client state.
    ///
    /// Notifications carrying neither a delivery id nor a sequence number are
    /// dropped.
    pub fn on_raw_sync_response_received(
        &self,
        response: RawSyncResponse,
    ) -> SyncResult<SyncRoundResult> {
        self.on_sync_response_received(response.into_response())
    }

    /// Runs one sync round over `channel`: build, exchange, fold.
    ///
    /// The lock is released while the channel is busy. A channel error leaves
    /// all state as it was; no retry is attempted.
    pub fn sync_once<C: SyncChannel + ?Sized>(&self, channel: &C) -> SyncResult<SyncRoundResult> {
        let request = self.create_sync_request()?;
        let response = channel.exchange(&request).map_err(|e| {
            self.pending.lock().stats.last_error = Some(e.to_string());
            e
        })?;
        self.on_sync_response_received(response)
    }

    /// Returns the subscription commands waiting for the next response.
    pub fn pending_commands(&self) -> Vec<SubscriptionCommand> {
        self.pending.lock().intents.drain().to_vec()
    }

    /// Returns the unicast delivery ids waiting to be acknowledged.
    pub fn pending_acknowledgments(&self) -> Vec<String> {
        self.pending.lock().acks.snapshot()
    }

    /// Returns the cumulative statistics.
    pub fn stats(&self) -> TransportStats {
        self.pending.lock().stats.clone()
    }
}

impl<S: ClientStateStorage> std::fmt::Debug for NotificationTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationTransport")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
