//! Incoming response folding.

use crate::config::TransportConfig;
use crate::error::SyncResult;
use crate::pending::{SubscriptionIntentQueue, UnicastAckBuffer};
use notisync_protocol::{
    topic_list_hash, Notification, SequenceNumber, SyncResponse, SyncResponseStatus, Topic,
    TopicId,
};
use notisync_state::ClientStateStorage;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Summary of one processed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRoundResult {
    /// Whether the response replaced the topic catalog.
    pub catalog_refreshed: bool,
    /// New topic list fingerprint, if the catalog was replaced.
    pub topic_list_hash: Option<i32>,
    /// Broadcasts applied to a tracked topic.
    pub applied: u64,
    /// Broadcasts dropped because their topic is not tracked.
    pub dropped: u64,
    /// Unicast delivery ids queued for acknowledgment.
    pub accepted_unicast: u64,
    /// Pending subscription commands cleared by this response.
    pub cleared_commands: u64,
}

/// Folds responses into the store and the pending buffers.
pub(crate) struct ResponseProcessor<'a, S: ?Sized> {
    store: &'a S,
    config: &'a TransportConfig,
}

impl<'a, S: ClientStateStorage + ?Sized> ResponseProcessor<'a, S> {
    pub(crate) fn new(store: &'a S, config: &'a TransportConfig) -> Self {
        Self { store, config }
    }

    /// Processes one response.
    ///
    /// Store writes happen before the buffers are touched, so a store error
    /// leaves the pending acknowledgments and commands as they were.
    pub(crate) fn process(
        &self,
        response: SyncResponse,
        intents: &mut SubscriptionIntentQueue,
        acks: &mut UnicastAckBuffer,
    ) -> SyncResult<SyncRoundResult> {
        let SyncResponse {
            status,
            topics,
            notifications,
        } = response;
        let mut result = SyncRoundResult::default();

        let mut progress = match topics {
            Some(topics) if status == SyncResponseStatus::Delta => {
                let hash = topic_list_hash(&topics);
                let progress = self.initial_progress(&topics)?;
                debug!(
                    topics = topics.len(),
                    tracked = progress.len(),
                    hash,
                    "topic catalog refreshed"
                );
                result.catalog_refreshed = true;
                result.topic_list_hash = Some(hash);
                progress
            }
            _ => self.store.topic_progress()?,
        };

        let mut unicast_ids = Vec::new();
        for notification in notifications.into_iter().flatten() {
            match notification {
                Notification::Unicast { delivery_id, .. } => unicast_ids.push(delivery_id),
                Notification::Broadcast {
                    topic_id,
                    sequence_number,
                    ..
                } => match progress.get_mut(&topic_id) {
                    Some(marker) => {
                        *marker = self.config.progress_policy.apply(*marker, sequence_number);
                        result.applied += 1;
                    }
                    None => {
                        trace!(topic_id, sequence_number, "dropping broadcast for untracked topic");
                        result.dropped += 1;
                    }
                },
            }
        }

        if result.catalog_refreshed || result.applied > 0 {
            self.store.set_topic_progress(progress)?;
        }
        // Hash last, so a failed progress write keeps the old hash.
        if let Some(hash) = result.topic_list_hash {
            self.store.set_topic_list_hash(hash)?;
        }
        if self.config.persist_after_response {
            self.store.persist()?;
        }

        result.accepted_unicast = unicast_ids.len() as u64;
        acks.replace(unicast_ids);

        result.cleared_commands = intents.len() as u64;
        intents.clear();

        Ok(result)
    }

    /// Builds a fresh progress map for a new catalog.
    ///
    /// Mandatory topics and subscribed optional topics start at zero; all
    /// other topics get no entry.
    fn initial_progress(&self, topics: &[Topic]) -> SyncResult<BTreeMap<TopicId, SequenceNumber>> {
        let mut progress = BTreeMap::new();
        for topic in topics {
            if topic.is_mandatory() || self.store.is_subscribed(topic.id)? {
                progress.insert(topic.id, 0);
            }
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressPolicy;
    use notisync_protocol::SubscriptionCommand;
    use notisync_state::{ClientState, MemoryStateStore};

    fn catalog() -> Vec<Topic> {
        vec![
            Topic::optional(1),
            Topic::mandatory(2),
            Topic::mandatory(3),
            Topic::optional(4),
        ]
    }

    fn process(
        store: &MemoryStateStore,
        config: &TransportConfig,
        response: SyncResponse,
    ) -> SyncRoundResult {
        let mut intents = SubscriptionIntentQueue::new();
        let mut acks = UnicastAckBuffer::new();
        ResponseProcessor::new(store, config)
            .process(response, &mut intents, &mut acks)
            .unwrap()
    }

    #[test]
    fn catalog_refresh_tracks_mandatory_and_subscribed() {
        let store = MemoryStateStore::new();
        store.subscribe(4);
        let config = TransportConfig::default();

        let result = process(&store, &config, SyncResponse::delta(catalog()));

        assert!(result.catalog_refreshed);
        assert_eq!(
            store.topic_progress().unwrap(),
            BTreeMap::from([(2, 0), (3, 0), (4, 0)])
        );
        assert_eq!(result.topic_list_hash, Some(store.topic_list_hash().unwrap()));
    }

    #[test]
    fn catalog_refresh_drops_stale_entries() {
        let store = MemoryStateStore::with_state(ClientState {
            topic_list_hash: 11,
            topic_progress: BTreeMap::from([(2, 40), (9, 3)]),
            ..Default::default()
        });
        let config = TransportConfig::default();

        process(&store, &config, SyncResponse::delta(vec![Topic::mandatory(2)]));

        assert_eq!(store.topic_progress().unwrap(), BTreeMap::from([(2, 0)]));
        assert_ne!(store.topic_list_hash().unwrap(), 11);
    }

    #[test]
    fn empty_catalog_still_sets_hash() {
        let store = MemoryStateStore::with_state(ClientState {
            topic_progress: BTreeMap::from([(2, 4)]),
            ..Default::default()
        });
        let config = TransportConfig::default();

        let result = process(&store, &config, SyncResponse::delta(vec![]));

        assert!(store.topic_progress().unwrap().is_empty());
        assert_eq!(result.topic_list_hash, Some(topic_list_hash(&[])));
        assert_ne!(store.topic_list_hash().unwrap(), 0);
    }

    #[test]
    fn topics_without_delta_are_ignored() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::default();
        let response = SyncResponse {
            status: SyncResponseStatus::NoDelta,
            topics: Some(catalog()),
            notifications: None,
        };

        let result = process(&store, &config, response);

        assert!(!result.catalog_refreshed);
        assert!(store.topic_progress().unwrap().is_empty());
        assert_eq!(store.topic_list_hash().unwrap(), 0);
    }

    #[test]
    fn refresh_and_fold_in_one_response() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::default();
        let response = SyncResponse::delta(catalog()).with_notifications(vec![
            Notification::broadcast(3, 7),
            Notification::broadcast(1, 2),
        ]);

        let result = process(&store, &config, response);

        assert_eq!(result.applied, 1);
        assert_eq!(result.dropped, 1);
        assert_eq!(
            store.topic_progress().unwrap(),
            BTreeMap::from([(2, 0), (3, 7)])
        );
    }

    #[test]
    fn last_applied_can_regress() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::default();
        process(&store, &config, SyncResponse::delta(vec![Topic::mandatory(2)]));

        let response = SyncResponse::no_delta().with_notifications(vec![
            Notification::broadcast(2, 9),
            Notification::broadcast(2, 4),
        ]);
        process(&store, &config, response);

        assert_eq!(store.topic_progress().unwrap()[&2], 4);
    }

    #[test]
    fn max_seen_never_regresses() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::new().with_progress_policy(ProgressPolicy::MaxSeen);
        process(&store, &config, SyncResponse::delta(vec![Topic::mandatory(2)]));

        let response = SyncResponse::no_delta().with_notifications(vec![
            Notification::broadcast(2, 9),
            Notification::broadcast(2, 4),
        ]);
        process(&store, &config, response);

        assert_eq!(store.topic_progress().unwrap()[&2], 9);
    }

    #[test]
    fn unicasts_replace_ack_buffer_and_commands_clear() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::default();
        let mut intents = SubscriptionIntentQueue::new();
        intents.record(vec![SubscriptionCommand::add(1), SubscriptionCommand::remove(2)]);
        let mut acks = UnicastAckBuffer::new();
        acks.replace(vec!["old".into()]);

        let response = SyncResponse::no_delta().with_notifications(vec![
            Notification::unicast(1, "u1"),
            Notification::broadcast(5, 1),
            Notification::unicast(8, "u2"),
        ]);
        let result = ResponseProcessor::new(&store, &config)
            .process(response, &mut intents, &mut acks)
            .unwrap();

        assert_eq!(acks.snapshot(), vec!["u1".to_string(), "u2".to_string()]);
        assert!(intents.is_empty());
        assert_eq!(result.accepted_unicast, 2);
        assert_eq!(result.cleared_commands, 2);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn absent_notifications_empty_the_ack_buffer() {
        let store = MemoryStateStore::new();
        let config = TransportConfig::default();
        let mut intents = SubscriptionIntentQueue::new();
        let mut acks = UnicastAckBuffer::new();
        acks.replace(vec!["pending".into()]);

        ResponseProcessor::new(&store, &config)
            .process(SyncResponse::no_delta(), &mut intents, &mut acks)
            .unwrap();

        assert!(acks.is_empty());
    }
}
