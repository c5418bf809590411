//! # NotiSync State
//!
//! Durable client state for the notification sync transport.
//!
//! This crate provides the narrow storage contract the transport consumes
//! ([`ClientStateStorage`]) and two implementations of it.
//!
//! ## Design Principles
//!
//! - The transport only reads and writes through the trait
//! - Subscription membership is maintained by the application, not the
//!   transport; stores expose it as inherent methods
//! - Stores must be `Send + Sync`; they are shared between the application
//!   thread and the network thread
//!
//! ## Available Stores
//!
//! - [`MemoryStateStore`] - For testing and ephemeral clients
//! - [`FileStateStore`] - Persists a CBOR snapshot to a single file
//!
//! ## Example
//!
//! ```rust
//! use notisync_state::{ClientStateStorage, MemoryStateStore};
//!
//! let store = MemoryStateStore::new();
//! store.subscribe(7);
//! assert!(store.is_subscribed(7).unwrap());
//! assert_eq!(store.topic_list_hash().unwrap(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod snapshot;

pub use backend::ClientStateStorage;
pub use error::{StateError, StateResult};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use snapshot::{ClientState, STATE_FORMAT_VERSION};
