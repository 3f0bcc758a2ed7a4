use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::backend::SnapshotBackend;
use crate::error::{StoreError, StoreResult};
use crate::snapshot::Snapshot;

/// Durable store backed by a single JSON snapshot file.
///
/// Every mutation rewrites the whole file: the new snapshot is written to a
/// temporary file in the same directory, synced, then renamed over the old
/// one. A crash at any point leaves either the old or the new snapshot on
/// disk, never a torn one.
pub struct FileStore {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl FileStore {
    /// Load the snapshot at `path`, or start an empty one if the file does
    /// not exist yet.
    ///
    /// A file that exists but does not parse is reported as
    /// [`StoreError::Corrupt`] and left untouched.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let snapshot = match fs::read(&path) {
            Ok(bytes) => Self::decode(&path, &bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let empty = Snapshot::new();
                replace_file(&path, &empty)?;
                if let Err(e) = sync_parent(&path) {
                    warn!(path = %path.display(), error = %e, "directory sync failed");
                }
                empty
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            users = snapshot.users.len(),
            chirps = snapshot.chirps.len(),
            "store opened"
        );
        Ok(Self {
            path,
            state: Mutex::new(snapshot),
        })
    }

    /// Load an existing snapshot. Unlike [`open`](Self::open), a missing
    /// file is an error and nothing is created.
    pub fn open_existing(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no database at {}", path.display()),
            )));
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(path: &Path, bytes: &[u8]) -> StoreResult<Snapshot> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Snapshot::new());
        }
        let corrupt = |reason: String| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };
        let snapshot = Snapshot::from_json(bytes).map_err(|e| corrupt(e.to_string()))?;
        snapshot.check_integrity().map_err(corrupt)?;
        Ok(snapshot)
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileStore {
    /// Stage the mutation on a copy, replace the file, then commit to memory.
    /// The rename is the commit point: once it succeeds, memory follows the
    /// file even if the directory sync afterwards fails.
    fn write_with<R>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> StoreResult<R>,
        sync: impl FnOnce(&Path) -> io::Result<()>,
    ) -> StoreResult<R> {
        let mut guard = self.lock();
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        replace_file(&self.path, &staged)?;
        *guard = staged;
        drop(guard);

        if let Err(e) = sync(&self.path) {
            warn!(path = %self.path.display(), error = %e, "directory sync failed");
        }
        Ok(out)
    }
}

impl SnapshotBackend for FileStore {
    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.lock())
    }

    fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> StoreResult<R>) -> StoreResult<R> {
        self.write_with(f, sync_parent)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Replace `path` with `snapshot` via temp file, fsync and rename.
fn replace_file(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    let bytes = snapshot.to_json()?;
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot persisted");
    Ok(())
}

/// Make a completed rename durable.
fn sync_parent(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    fs::File::open(parent_dir(path))?.sync_all()?;
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Store;
    use chirpy_types::PasswordHash;

    fn hash(s: &str) -> PasswordHash {
        PasswordHash::from_encoded(s)
    }

    #[test]
    fn open_creates_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.chirp_count().unwrap(), 0);
        assert_eq!(store.user_count().unwrap(), 0);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/database.json");
        FileStore::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_file_is_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(&path, "").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.chirp_count().unwrap(), 0);
    }

    #[test]
    fn corrupt_file_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(&path, "{ not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn mutation_is_on_disk_before_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();
        store.create_chirp("durable").unwrap();

        let on_disk = Snapshot::from_json(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk.chirps.len(), 1);
        assert_eq!(on_disk.chirps_ascending()[0].body, "durable");
    }

    #[test]
    fn reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let (users, chirps) = {
            let store = FileStore::open(&path).unwrap();
            for i in 0..3 {
                store.create_user(&format!("user{i}@example.com"), hash(&format!("h{i}"))).unwrap();
            }
            for i in 0..5 {
                store.create_chirp(&format!("chirp {i}")).unwrap();
            }
            (store.list_users().unwrap(), store.list_chirps().unwrap())
        };

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.list_users().unwrap(), users);
        assert_eq!(reopened.list_chirps().unwrap(), chirps);
        assert_eq!(
            reopened.get_user_by_email("user1@example.com").unwrap().password_hash,
            hash("h1")
        );
    }

    #[test]
    fn numbering_continues_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.create_chirp("one").unwrap();
            store.create_chirp("two").unwrap();
            store.create_user("a@example.com", hash("h")).unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.create_chirp("three").unwrap().id.get(), 3);
        assert_eq!(store.create_user("b@example.com", hash("h")).unwrap().id.get(), 2);
    }

    #[test]
    fn numbering_continues_from_max_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(
            &path,
            r#"{"users": {}, "chirps": {"4": {"id": 4, "body": "a"}, "9": {"id": 9, "body": "b"}}}"#,
        )
        .unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.create_chirp("c").unwrap().id.get(), 10);
    }

    #[test]
    fn rejected_mutation_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();
        store.create_user("a@example.com", hash("h")).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(store.create_user("a@example.com", hash("h2")).is_err());
        assert!(store.create_chirp(&"x".repeat(141)).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn failed_persist_rolls_back_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();
        store.create_chirp("kept").unwrap();

        // A non-empty directory at the snapshot path makes the rename fail
        // regardless of privileges.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let err = store.create_chirp("lost").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.chirp_count().unwrap(), 1);

        fs::remove_dir_all(&path).unwrap();
        assert_eq!(store.create_chirp("next").unwrap().id.get(), 2);
        let on_disk = Snapshot::from_json(&fs::read(&path).unwrap()).unwrap();
        let bodies: Vec<_> = on_disk.chirps_ascending().into_iter().map(|c| c.body).collect();
        assert_eq!(bodies, ["kept", "next"]);
    }

    #[test]
    fn failed_directory_sync_still_commits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();

        let chirp = store
            .write_with(
                |snap| snap.insert_chirp("renamed"),
                |_| Err(io::Error::new(io::ErrorKind::Other, "sync refused")),
            )
            .unwrap();
        assert_eq!(chirp.id.get(), 1);

        // Memory matches the file, so the id is not handed out twice.
        let on_disk = Snapshot::from_json(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk.chirps.len(), 1);
        assert_eq!(store.chirp_count().unwrap(), 1);
        assert_eq!(store.create_chirp("after").unwrap().id.get(), 2);
    }

    #[test]
    fn open_existing_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/database.json");
        let err = FileStore::open_existing(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(!path.exists());
        assert!(!dir.path().join("missing").exists());

        let path = dir.path().join("database.json");
        FileStore::open(&path).unwrap().create_chirp("hi").unwrap();
        assert_eq!(FileStore::open_existing(&path).unwrap().chirp_count().unwrap(), 1);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).unwrap();
        for i in 0..5 {
            store.create_chirp(&format!("{i}")).unwrap();
        }
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn concurrent_creates_are_contiguous_from_previous_max() {
        use std::collections::BTreeSet;
        use std::sync::Arc;
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = Arc::new(FileStore::open(&path).unwrap());
        store.create_chirp("seed 1").unwrap();
        store.create_chirp("seed 2").unwrap();

        let n = 12;
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.create_chirp(&format!("concurrent {i}")).unwrap().id.get())
            })
            .collect();
        let ids: BTreeSet<u64> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();

        assert_eq!(ids, (3..3 + n).collect());
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.chirp_count().unwrap(), 2 + n as usize);
    }
}
