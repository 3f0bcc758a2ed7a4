use chirpy_types::{Chirp, ChirpId, PasswordHash, User, UserId, UserRecord};

use crate::error::StoreResult;

/// Source of truth for users and chirps.
///
/// All implementations must satisfy these invariants:
/// - Every read reflects all writes that completed before it.
/// - Mutations are serialized: validate, allocate, mutate and persist happen
///   under one lock, so concurrent creates never share an id.
/// - A mutation is durable before it returns `Ok`; on `Err` nothing changed.
/// - Returned user views never carry a password hash, except
///   [`get_user_by_email`](Store::get_user_by_email), which exists for
///   credential checks.
pub trait Store: Send + Sync {
    /// Create a user. Fails with `AlreadyExists` if the email is taken.
    fn create_user(&self, email: &str, password_hash: PasswordHash) -> StoreResult<User>;

    fn user_exists(&self, email: &str) -> StoreResult<bool>;

    /// The full record, including the password hash.
    fn get_user_by_email(&self, email: &str) -> StoreResult<UserRecord>;

    fn get_user(&self, id: UserId) -> StoreResult<User>;

    /// Replace email and hash for `id` in place. The id never changes.
    fn update_user(&self, id: UserId, email: &str, password_hash: PasswordHash)
        -> StoreResult<User>;

    /// All users, ascending by id.
    fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Append a chirp. Fails with `Validation` if the body is too long.
    fn create_chirp(&self, body: &str) -> StoreResult<Chirp>;

    /// All chirps, ascending by id (which is creation order).
    fn list_chirps(&self) -> StoreResult<Vec<Chirp>>;

    fn get_chirp(&self, id: ChirpId) -> StoreResult<Chirp>;

    fn user_count(&self) -> StoreResult<usize>;

    fn chirp_count(&self) -> StoreResult<usize>;
}
