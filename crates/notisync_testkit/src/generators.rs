//! Property-based test generators using proptest.
//!
//! Provides strategies for generating protocol values that respect the
//! invariants the server guarantees (unique topic ids within a catalog).

use notisync_protocol::{
    Notification, SubscriptionCommand, SubscriptionType, SyncResponse, SyncResponseStatus, Topic,
    TopicId,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating topic ids from a small range so that
/// notifications and commands hit catalog topics often.
pub fn topic_id_strategy() -> impl Strategy<Value = TopicId> {
    0i64..32
}

/// Strategy for generating subscription types.
pub fn subscription_type_strategy() -> impl Strategy<Value = SubscriptionType> {
    prop_oneof![
        Just(SubscriptionType::Mandatory),
        Just(SubscriptionType::Optional),
    ]
}

/// Strategy for generating a catalog with unique topic ids.
pub fn catalog_strategy() -> impl Strategy<Value = Vec<Topic>> {
    prop::collection::btree_map(topic_id_strategy(), subscription_type_strategy(), 0..16)
        .prop_map(|topics: BTreeMap<TopicId, SubscriptionType>| {
            topics
                .into_iter()
                .map(|(id, subscription_type)| Topic {
                    id,
                    subscription_type,
                })
                .collect()
        })
        .prop_shuffle()
}

/// Strategy for generating subscription commands.
pub fn subscription_command_strategy() -> impl Strategy<Value = SubscriptionCommand> {
    (topic_id_strategy(), any::<bool>()).prop_map(|(topic_id, add)| {
        if add {
            SubscriptionCommand::add(topic_id)
        } else {
            SubscriptionCommand::remove(topic_id)
        }
    })
}

/// Strategy for generating broadcast and unicast notifications.
pub fn notification_strategy() -> impl Strategy<Value = Notification> {
    prop_oneof![
        (topic_id_strategy(), 0u32..1000)
            .prop_map(|(topic_id, seq)| Notification::broadcast(topic_id, seq)),
        (
            topic_id_strategy(),
            prop::string::string_regex("[a-z0-9]{1,12}").expect("Invalid regex")
        )
            .prop_map(|(topic_id, uid)| Notification::unicast(topic_id, uid)),
    ]
}

/// Strategy for generating whole responses.
pub fn sync_response_strategy() -> impl Strategy<Value = SyncResponse> {
    (
        any::<bool>(),
        prop::option::of(catalog_strategy()),
        prop::option::of(prop::collection::vec(notification_strategy(), 0..12)),
    )
        .prop_map(|(delta, topics, notifications)| SyncResponse {
            status: if delta {
                SyncResponseStatus::Delta
            } else {
                SyncResponseStatus::NoDelta
            },
            topics,
            notifications,
        })
}
