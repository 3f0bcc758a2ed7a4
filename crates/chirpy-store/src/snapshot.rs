use std::collections::BTreeMap;

use chirpy_types::{Chirp, ChirpId, PasswordHash, User, UserId, UserRecord, MAX_CHIRP_LEN};
use serde::{Deserialize, Serialize};

use crate::allocator::next_id;
use crate::error::{StoreError, StoreResult};

/// The complete state of the data set at a point in time.
///
/// Serialized as a single JSON document with two top-level collections,
/// each a map keyed by decimal id:
///
/// ```text
/// { "users":  { "1": { "id": 1, "email": "...", "password_hash": "..." } },
///   "chirps": { "1": { "id": 1, "body": "..." } } }
/// ```
///
/// The operations here are pure in-memory transitions; durability is the
/// backend's job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: BTreeMap<UserId, UserRecord>,
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(bytes: &[u8]) -> StoreResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Check the invariants a loaded snapshot must satisfy: map keys match
    /// record ids, emails are unique, and chirp bodies fit.
    pub fn check_integrity(&self) -> Result<(), String> {
        let mut seen = BTreeMap::new();
        for (key, user) in &self.users {
            if *key != user.id {
                return Err(format!("user key {key} holds record with id {}", user.id));
            }
            if let Some(other) = seen.insert(user.email.as_str(), user.id) {
                return Err(format!(
                    "email {:?} shared by users {other} and {}",
                    user.email, user.id
                ));
            }
        }
        for (key, chirp) in &self.chirps {
            if *key != chirp.id {
                return Err(format!("chirp key {key} holds record with id {}", chirp.id));
            }
            if !Chirp::fits(&chirp.body) {
                return Err(format!("chirp {key} exceeds {MAX_CHIRP_LEN} characters"));
            }
        }
        Ok(())
    }

    // ---- Users ----

    pub fn find_user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|u| u.email == email)
    }

    pub fn insert_user(&mut self, email: &str, password_hash: PasswordHash) -> StoreResult<User> {
        if self.find_user_by_email(email).is_some() {
            return Err(StoreError::AlreadyExists(email.to_string()));
        }
        let id = next_id(&self.users)?;
        let record = UserRecord {
            id,
            email: email.to_string(),
            password_hash,
        };
        let user = record.to_user();
        self.users.insert(id, record);
        Ok(user)
    }

    pub fn replace_user(
        &mut self,
        id: UserId,
        email: &str,
        password_hash: PasswordHash,
    ) -> StoreResult<User> {
        if let Some(holder) = self.find_user_by_email(email) {
            if holder.id != id {
                return Err(StoreError::AlreadyExists(email.to_string()));
            }
        }
        let record = self
            .users
            .get_mut(&id)
            .ok_or(StoreError::UserIdNotFound(id))?;
        record.email = email.to_string();
        record.password_hash = password_hash;
        Ok(record.to_user())
    }

    pub fn users_ascending(&self) -> Vec<User> {
        self.users.values().map(UserRecord::to_user).collect()
    }

    // ---- Chirps ----

    pub fn insert_chirp(&mut self, body: &str) -> StoreResult<Chirp> {
        let len = Chirp::body_len(body);
        if len > MAX_CHIRP_LEN {
            return Err(StoreError::Validation(format!(
                "chirp body is {len} characters, maximum is {MAX_CHIRP_LEN}"
            )));
        }
        let id = next_id(&self.chirps)?;
        let chirp = Chirp {
            id,
            body: body.to_string(),
        };
        self.chirps.insert(id, chirp.clone());
        Ok(chirp)
    }

    pub fn chirps_ascending(&self) -> Vec<Chirp> {
        self.chirps.values().cloned().collect()
    }
}
