use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::SnapshotBackend;
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

/// In-memory store with no persistence.
///
/// Intended for tests and embedding. Same locking and rollback semantics as
/// [`FileStore`](crate::FileStore), minus the file.
pub struct InMemoryStore {
    state: Mutex<Snapshot>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::new())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    // The snapshot is only ever replaced wholesale after a successful
    // mutation, so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBackend for InMemoryStore {
    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.lock())
    }

    fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> StoreResult<R>) -> StoreResult<R> {
        let mut guard = self.lock();
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        *guard = staged;
        Ok(out)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.lock();
        f.debug_struct("InMemoryStore")
            .field("users", &snap.users.len())
            .field("chirps", &snap.chirps.len())
            .finish()
    }
}
