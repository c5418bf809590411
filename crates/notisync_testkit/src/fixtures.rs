//! Test fixtures and store helpers.
//!
//! Provides canned topic catalogs, wire-shaped notifications and stores for
//! exercising the transport.

use notisync_protocol::{RawNotification, SequenceNumber, Topic, TopicId};
use notisync_state::{
    ClientStateStorage, FileStateStore, MemoryStateStore, StateError, StateResult,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

/// Catalog with optional topics 1 and 4 and mandatory topics 2 and 3.
pub fn mixed_catalog() -> Vec<Topic> {
    vec![
        Topic::optional(1),
        Topic::mandatory(2),
        Topic::mandatory(3),
        Topic::optional(4),
    ]
}

/// Wire-shaped broadcast notification.
pub fn raw_broadcast(topic_id: TopicId, sequence_number: SequenceNumber) -> RawNotification {
    RawNotification {
        topic_id,
        sequence_number: Some(sequence_number),
        ..Default::default()
    }
}

/// Wire-shaped unicast notification.
pub fn raw_unicast(topic_id: TopicId, delivery_id: &str) -> RawNotification {
    RawNotification {
        topic_id,
        delivery_id: Some(delivery_id.to_string()),
        ..Default::default()
    }
}

/// Wire-shaped notification with neither a sequence number nor a delivery id.
pub fn raw_unmarked(topic_id: TopicId) -> RawNotification {
    RawNotification {
        topic_id,
        ..Default::default()
    }
}

/// A memory store whose reads and writes can be made to fail.
#[derive(Debug, Default)]
pub struct FailingStateStore {
    /// The wrapped store.
    pub inner: MemoryStateStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStateStore {
    /// Creates a store that does not fail yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool) -> StateResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StateError::Unavailable("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

impl ClientStateStorage for FailingStateStore {
    fn topic_progress(&self) -> StateResult<BTreeMap<TopicId, SequenceNumber>> {
        self.check(&self.fail_reads)?;
        self.inner.topic_progress()
    }

    fn set_topic_progress(&self, progress: BTreeMap<TopicId, SequenceNumber>) -> StateResult<()> {
        self.check(&self.fail_writes)?;
        self.inner.set_topic_progress(progress)
    }

    fn topic_list_hash(&self) -> StateResult<i32> {
        self.check(&self.fail_reads)?;
        self.inner.topic_list_hash()
    }

    fn set_topic_list_hash(&self, hash: i32) -> StateResult<()> {
        self.check(&self.fail_writes)?;
        self.inner.set_topic_list_hash(hash)
    }

    fn is_subscribed(&self, topic_id: TopicId) -> StateResult<bool> {
        self.check(&self.fail_reads)?;
        self.inner.is_subscribed(topic_id)
    }
}

/// A file-backed store in a temporary directory.
///
/// The directory is removed when this value is dropped.
pub struct TestFileStore {
    dir: TempDir,
}

impl TestFileStore {
    /// Creates a fresh temporary directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the state file inside the directory.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("client.state")
    }

    /// Opens the store. Only one store may be open at a time.
    pub fn open(&self) -> FileStateStore {
        FileStateStore::open(&self.path()).expect("Failed to open file state store")
    }
}

impl Default for TestFileStore {
    fn default() -> Self {
        Self::new()
    }
}
