//! Outgoing request assembly.

use crate::error::SyncResult;
use crate::pending::{SubscriptionIntentQueue, UnicastAckBuffer};
use notisync_protocol::{SyncRequest, UNSET_TOPIC_LIST_HASH};
use notisync_state::ClientStateStorage;

/// Builds a request snapshot from pending state and the store.
///
/// Empty collections and an unset fingerprint are left out of the request.
/// Nothing is modified.
pub(crate) fn build_request<S>(
    store: &S,
    intents: &SubscriptionIntentQueue,
    acks: &UnicastAckBuffer,
) -> SyncResult<SyncRequest>
where
    S: ClientStateStorage + ?Sized,
{
    let subscription_commands =
        (!intents.is_empty()).then(|| intents.drain().to_vec());
    let accepted_unicast_ids = (!acks.is_empty()).then(|| acks.snapshot());

    let topic_list_hash =
        Some(store.topic_list_hash()?).filter(|hash| *hash != UNSET_TOPIC_LIST_HASH);
    let topic_progress = Some(store.topic_progress()?).filter(|progress| !progress.is_empty());

    Ok(SyncRequest {
        accepted_unicast_ids,
        subscription_commands,
        topic_list_hash,
        topic_progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notisync_protocol::SubscriptionCommand;
    use notisync_state::{ClientState, MemoryStateStore};
    use std::collections::BTreeMap;

    #[test]
    fn empty_state_builds_empty_request() {
        let store = MemoryStateStore::new();
        let request = build_request(
            &store,
            &SubscriptionIntentQueue::new(),
            &UnicastAckBuffer::new(),
        )
        .unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn every_field_present() {
        let store = MemoryStateStore::with_state(ClientState {
            topic_list_hash: -3,
            topic_progress: BTreeMap::from([(2, 5)]),
            ..Default::default()
        });
        let mut intents = SubscriptionIntentQueue::new();
        intents.record(vec![SubscriptionCommand::add(1)]);
        let mut acks = UnicastAckBuffer::new();
        acks.replace(vec!["uid".into()]);

        let request = build_request(&store, &intents, &acks).unwrap();
        assert_eq!(
            request.subscription_commands,
            Some(vec![SubscriptionCommand::add(1)])
        );
        assert_eq!(request.accepted_unicast_ids, Some(vec!["uid".to_string()]));
        assert_eq!(request.topic_list_hash, Some(-3));
        assert_eq!(request.topic_progress, Some(BTreeMap::from([(2, 5)])));
    }

    #[test]
    fn zero_sequence_progress_is_still_sent() {
        let store = MemoryStateStore::with_state(ClientState {
            topic_progress: BTreeMap::from([(2, 0)]),
            ..Default::default()
        });
        let request = build_request(
            &store,
            &SubscriptionIntentQueue::new(),
            &UnicastAckBuffer::new(),
        )
        .unwrap();
        assert_eq!(request.topic_progress, Some(BTreeMap::from([(2, 0)])));
        assert_eq!(request.topic_list_hash, None);
    }
}
