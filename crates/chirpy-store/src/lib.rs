//! Persistence for Chirpy.
//!
//! The whole data set (users and chirps) lives in one [`Snapshot`]. A store
//! owns the in-memory snapshot exclusively and mediates every read and
//! write through a single lock.
//!
//! # Storage Backends
//!
//! All backends implement the [`Store`] trait:
//!
//! - [`FileStore`] -- JSON snapshot file, rewritten atomically on every mutation
//! - [`InMemoryStore`] -- no persistence, for tests and embedding
//!
//! # Design Rules
//!
//! 1. Every mutation is durable before it is acknowledged.
//! 2. The snapshot file is replaced by rename, never written in place.
//! 3. A failed mutation leaves both the file and the in-memory state unchanged.
//! 4. Identifiers are `max(existing) + 1` per collection and never reused.
//! 5. Emails are unique across users, compared exactly.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod allocator;
pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use allocator::{next_id, AllocatableId};
pub use backend::SnapshotBackend;
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
pub use traits::Store;
