//! # NotiSync Engine
//!
//! Client-side notification sync transport.
//!
//! This crate provides:
//! - Subscription intent queue and unicast acknowledgment buffer
//! - Sync request builder
//! - Sync response processor (catalog refresh, notification fold)
//! - Channel abstraction with a mock for testing
//!
//! ## Sync Round
//!
//! 1. The application records subscription changes
//! 2. The transport builds a request from pending state and the store
//! 3. A channel exchanges the request for a response
//! 4. The transport folds the response into the store
//!
//! ## Key Invariants
//!
//! - A progress entry exists only for mandatory and subscribed optional
//!   topics of the last known catalog
//! - Building a request never changes sync state
//! - Every processed response clears pending subscription commands
//! - Only the unicast ids of the latest response are acknowledged
//!
//! ## Example
//!
//! ```rust
//! use notisync_engine::NotificationTransport;
//! use notisync_protocol::{SubscriptionCommand, SyncResponse, Topic};
//! use notisync_state::MemoryStateStore;
//! use std::sync::Arc;
//!
//! let transport = NotificationTransport::new(Arc::new(MemoryStateStore::new()));
//! transport.on_subscription_changed(vec![SubscriptionCommand::add(1)]);
//!
//! let request = transport.create_sync_request().unwrap();
//! assert_eq!(request.subscription_commands.map(|c| c.len()), Some(1));
//!
//! transport
//!     .on_sync_response_received(SyncResponse::delta(vec![Topic::mandatory(2)]))
//!     .unwrap();
//! let request = transport.create_sync_request().unwrap();
//! assert!(request.subscription_commands.is_none());
//! assert!(request.topic_list_hash.is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod channel;
mod config;
mod error;
mod pending;
mod processor;
mod transport;

pub use channel::{MockChannel, SyncChannel};
pub use config::{ProgressPolicy, TransportConfig};
pub use error::{SyncError, SyncResult};
pub use pending::{SubscriptionIntentQueue, UnicastAckBuffer};
pub use processor::SyncRoundResult;
pub use transport::{NotificationTransport, TransportStats};
