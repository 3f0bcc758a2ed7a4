use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// An encoded password hash (PHC string format).
///
/// The contents are opaque to everything except the credential manager.
/// `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded hash string.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash(<redacted>)")
    }
}

/// Public view of an account. This is the only user shape that leaves the
/// service layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

/// A stored account, including its credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: PasswordHash,
}

impl UserRecord {
    /// The public view of this record.
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
        }
    }
}
