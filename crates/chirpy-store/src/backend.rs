use chirpy_types::{Chirp, ChirpId, PasswordHash, User, UserId, UserRecord};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::Snapshot;
use crate::traits::Store;

/// Exclusive access to a [`Snapshot`], with or without durability.
///
/// Implementors provide the locking and persistence; every [`Store`]
/// operation is derived from these two methods.
pub trait SnapshotBackend: Send + Sync {
    /// Run `f` against the current snapshot under the store lock.
    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R;

    /// Run `f` against the snapshot under the store lock and make the result
    /// durable. If `f` or persistence fails, the snapshot is left as it was.
    fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> StoreResult<R>) -> StoreResult<R>;
}

impl<B: SnapshotBackend> Store for B {
    fn create_user(&self, email: &str, password_hash: PasswordHash) -> StoreResult<User> {
        let user = self.write(|snap| snap.insert_user(email, password_hash))?;
        tracing::info!(user = %user.id, "user created");
        Ok(user)
    }

    fn user_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.read(|snap| snap.find_user_by_email(email).is_some()))
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<UserRecord> {
        self.read(|snap| snap.find_user_by_email(email).cloned())
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))
    }

    fn get_user(&self, id: UserId) -> StoreResult<User> {
        self.read(|snap| snap.users.get(&id).map(UserRecord::to_user))
            .ok_or(StoreError::UserIdNotFound(id))
    }

    fn update_user(
        &self,
        id: UserId,
        email: &str,
        password_hash: PasswordHash,
    ) -> StoreResult<User> {
        let user = self.write(|snap| snap.replace_user(id, email, password_hash))?;
        tracing::info!(user = %user.id, "user updated");
        Ok(user)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read(Snapshot::users_ascending))
    }

    fn create_chirp(&self, body: &str) -> StoreResult<Chirp> {
        let chirp = self.write(|snap| snap.insert_chirp(body))?;
        tracing::info!(chirp = %chirp.id, "chirp created");
        Ok(chirp)
    }

    fn list_chirps(&self) -> StoreResult<Vec<Chirp>> {
        Ok(self.read(Snapshot::chirps_ascending))
    }

    fn get_chirp(&self, id: ChirpId) -> StoreResult<Chirp> {
        self.read(|snap| snap.chirps.get(&id).cloned())
            .ok_or(StoreError::ChirpNotFound(id))
    }

    fn user_count(&self) -> StoreResult<usize> {
        Ok(self.read(|snap| snap.users.len()))
    }

    fn chirp_count(&self) -> StoreResult<usize> {
        Ok(self.read(|snap| snap.chirps.len()))
    }
}
