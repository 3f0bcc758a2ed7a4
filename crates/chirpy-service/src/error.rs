use chirpy_crypto::{CredentialError, SessionError};
use chirpy_store::StoreError;
use thiserror::Error;

/// Service-level errors.
///
/// Credential and session failures are indistinguishable
/// ([`ServiceError::Unauthorized`]). [`ServiceError::Internal`] carries
/// detail for logs only; callers should surface it generically.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("{0} not found")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("chirp is too long: {len} characters, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists(_) => Self::AlreadyExists,
            StoreError::UserNotFound(_) | StoreError::UserIdNotFound(_) => {
                Self::NotFound("user".into())
            }
            StoreError::ChirpNotFound(_) => Self::NotFound("chirp".into()),
            StoreError::Validation(reason) => Self::Validation(reason),
            other => {
                tracing::error!(error = %other, "store failure");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<CredentialError> for ServiceError {
    fn from(e: CredentialError) -> Self {
        tracing::error!(error = %e, "credential failure");
        Self::Internal(e.to_string())
    }
}

impl From<SessionError> for ServiceError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Unauthorized => Self::Unauthorized,
            other => {
                tracing::error!(error = %other, "session failure");
                Self::Internal(other.to_string())
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
