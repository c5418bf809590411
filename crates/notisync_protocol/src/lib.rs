//! # NotiSync Protocol
//!
//! Notification sync protocol types for NotiSync.
//!
//! This crate provides:
//! - `Topic` and `SubscriptionType` for the server-side topic catalog
//! - `SubscriptionCommand` for pending subscription changes
//! - `Notification`, resolved once into broadcast or unicast form
//! - `SyncRequest` / `SyncResponse` exchanged in one sync round
//! - Topic list fingerprinting
//!
//! This is a pure protocol crate with no I/O operations. Encoding the
//! messages for a particular channel is left to the channel layer; all
//! types derive `serde` traits for that purpose.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod notification;
mod subscription;
mod topic;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{RawSyncResponse, SyncRequest, SyncResponse, SyncResponseStatus};
pub use notification::{Notification, RawNotification};
pub use subscription::{SubscriptionCommand, SubscriptionCommandType};
pub use topic::{topic_list_hash, SubscriptionType, Topic, UNSET_TOPIC_LIST_HASH};

/// Identifier of a topic in the server catalog.
pub type TopicId = i64;

/// Position of a broadcast notification within its topic.
pub type SequenceNumber = u32;
