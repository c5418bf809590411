//! File-based state store for persistent client state.

use crate::backend::ClientStateStorage;
use crate::error::{StateError, StateResult};
use crate::snapshot::{ClientState, StateFile, STATE_FORMAT_VERSION};
use fs2::FileExt;
use notisync_protocol::{SequenceNumber, TopicId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// A file-based state store.
///
/// The whole state is kept in memory and written to a single file as a
/// CBOR snapshot on [`persist`](ClientStateStorage::persist).
///
/// # Layout
///
/// ```text
/// <dir>/
/// ├─ <name>        # CBOR snapshot
/// ├─ <name>.lock   # Advisory lock, held while the store is open
/// └─ <name>.tmp    # Written then renamed over <name> on persist
/// ```
///
/// # Durability
///
/// Setters only touch memory. `persist()` writes the snapshot to a temporary
/// file, syncs it and renames it over the state file, so a crash leaves
/// either the old or the new snapshot in place.
///
/// # Example
///
/// ```no_run
/// use notisync_state::{ClientStateStorage, FileStateStore};
/// use std::path::Path;
///
/// let store = FileStateStore::open(Path::new("client.state")).unwrap();
/// store.set_topic_list_hash(42).unwrap();
/// store.persist().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    state: RwLock<ClientState>,
    dirty: AtomicBool,
    _lock_file: File,
}

impl FileStateStore {
    /// Opens or creates a state store at the given path.
    ///
    /// A missing or empty file yields a fresh state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another store holds the lock (returns `Locked`)
    /// - The file cannot be decoded (returns `Corrupted`)
    /// - The file has an unknown format version
    /// - An I/O error occurs
    pub fn open(path: &Path) -> StateResult<Self> {
        let lock_path = sibling(path, ".lock")?;
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StateError::Locked(lock_path));
        }

        let state = load(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(state),
            dirty: AtomicBool::new(false),
            _lock_file: lock_file,
        })
    }

    /// Opens or creates a state store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the store cannot
    /// be opened.
    pub fn open_with_create_dirs(path: &Path) -> StateResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> ClientState {
        self.state.read().clone()
    }

    /// Returns true if there are changes not yet persisted.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Adds an optional topic to the subscription set.
    pub fn subscribe(&self, topic_id: TopicId) {
        if self.state.write().subscriptions.insert(topic_id) {
            self.mark_dirty();
        }
    }

    /// Removes an optional topic from the subscription set.
    pub fn unsubscribe(&self, topic_id: TopicId) {
        if self.state.write().subscriptions.remove(&topic_id) {
            self.mark_dirty();
        }
    }

    /// Returns the subscription set.
    #[must_use]
    pub fn subscriptions(&self) -> BTreeSet<TopicId> {
        self.state.read().subscriptions.clone()
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StateResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StateResult<()> {
        Ok(())
    }
}

impl ClientStateStorage for FileStateStore {
    fn topic_progress(&self) -> StateResult<BTreeMap<TopicId, SequenceNumber>> {
        Ok(self.state.read().topic_progress.clone())
    }

    fn set_topic_progress(&self, progress: BTreeMap<TopicId, SequenceNumber>) -> StateResult<()> {
        self.state.write().topic_progress = progress;
        self.mark_dirty();
        Ok(())
    }

    fn topic_list_hash(&self) -> StateResult<i32> {
        Ok(self.state.read().topic_list_hash)
    }

    fn set_topic_list_hash(&self, hash: i32) -> StateResult<()> {
        self.state.write().topic_list_hash = hash;
        self.mark_dirty();
        Ok(())
    }

    fn is_subscribed(&self, topic_id: TopicId) -> StateResult<bool> {
        Ok(self.state.read().subscriptions.contains(&topic_id))
    }

    fn persist(&self) -> StateResult<()> {
        // Read guard is held until the dirty flag is cleared.
        let state = self.state.read();
        if !self.dirty.load(Ordering::SeqCst) {
            return Ok(());
        }

        let envelope = StateFile {
            version: STATE_FORMAT_VERSION,
            state: state.clone(),
        };
        let mut data = Vec::new();
        ciborium::into_writer(&envelope, &mut data)
            .map_err(|e| StateError::Encoding(e.to_string()))?;

        let temp_path = sibling(&self.path, ".tmp")?;
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        self.sync_directory()?;

        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Returns `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> StateResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        StateError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("state path has no file name: {}", path.display()),
        ))
    })?;
    let mut name = OsString::from(name);
    name.push(suffix);
    Ok(path.with_file_name(name))
}

fn load(path: &Path) -> StateResult<ClientState> {
    let mut data = Vec::new();
    match File::open(path) {
        Ok(mut file) => {
            file.read_to_end(&mut data)?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ClientState::default()),
        Err(e) => return Err(e.into()),
    }

    if data.is_empty() {
        return Ok(ClientState::default());
    }

    let envelope: StateFile =
        ciborium::from_reader(data.as_slice()).map_err(|e| StateError::Corrupted(e.to_string()))?;

    if envelope.version != STATE_FORMAT_VERSION {
        return Err(StateError::UnsupportedVersion {
            found: envelope.version,
            supported: STATE_FORMAT_VERSION,
        });
    }

    Ok(envelope.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_is_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.state(), ClientState::default());
        assert!(!store.is_dirty());
        assert!(!path.exists());
    }

    #[test]
    fn persist_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        {
            let store = FileStateStore::open(&path).unwrap();
            store.subscribe(4);
            store.set_topic_list_hash(1234).unwrap();
            store
                .set_topic_progress(BTreeMap::from([(2, 5), (3, 0)]))
                .unwrap();
            assert!(store.is_dirty());
            store.persist().unwrap();
            assert!(!store.is_dirty());
        }

        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.topic_list_hash().unwrap(), 1234);
        assert_eq!(
            store.topic_progress().unwrap(),
            BTreeMap::from([(2, 5), (3, 0)])
        );
        assert!(store.is_subscribed(4).unwrap());
    }

    #[test]
    fn unpersisted_changes_are_lost() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        {
            let store = FileStateStore::open(&path).unwrap();
            store.set_topic_list_hash(99).unwrap();
        }

        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.topic_list_hash().unwrap(), 0);
    }

    #[test]
    fn second_open_is_locked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        let _store = FileStateStore::open(&path).unwrap();
        let result = FileStateStore::open(&path);
        assert!(matches!(result, Err(StateError::Locked(_))));
    }

    #[test]
    fn corrupted_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");
        fs::write(&path, [0xff, 0x00, 0x13]).unwrap();

        let result = FileStateStore::open(&path);
        assert!(matches!(result, Err(StateError::Corrupted(_))));
    }

    #[test]
    fn unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        let envelope = StateFile {
            version: STATE_FORMAT_VERSION + 1,
            state: ClientState::default(),
        };
        let mut data = Vec::new();
        ciborium::into_writer(&envelope, &mut data).unwrap();
        fs::write(&path, data).unwrap();

        let result = FileStateStore::open(&path);
        assert!(matches!(
            result,
            Err(StateError::UnsupportedVersion { found, .. }) if found == STATE_FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn open_with_create_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("client.state");

        let store = FileStateStore::open_with_create_dirs(&path).unwrap();
        store.subscribe(1);
        store.persist().unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn clean_persist_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.state");

        let store = FileStateStore::open(&path).unwrap();
        store.persist().unwrap();
        assert!(!path.exists());

        store.unsubscribe(5);
        assert!(!store.is_dirty());
    }
}
