use std::path::PathBuf;

use chirpy_types::{ChirpId, UserId};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another user already holds this email.
    #[error("user already exists: {0}")]
    AlreadyExists(String),

    /// No user with this email.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No user with this id.
    #[error("user not found: {0}")]
    UserIdNotFound(UserId),

    /// No chirp with this id.
    #[error("chirp not found: {0}")]
    ChirpNotFound(ChirpId),

    /// Content constraint violated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A collection has used every representable identifier.
    #[error("identifier space exhausted")]
    IdSpaceExhausted,

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The snapshot file exists but cannot be loaded.
    #[error("corrupt snapshot {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for the "no such entity" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::UserIdNotFound(_) | Self::ChirpNotFound(_)
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
