/// Errors from password hashing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The hashing primitive failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The requested cost parameters are out of range.
    #[error("invalid hashing cost: {0}")]
    InvalidCost(String),
}

/// Errors from session token issuance and validation.
///
/// Every validation failure collapses into [`SessionError::Unauthorized`];
/// the precise reason is only logged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("signing secret must not be empty")]
    InvalidSecret,

    #[error("unauthorized")]
    Unauthorized,

    #[error("token signing failed: {0}")]
    Signing(String),
}

pub type CredentialResult<T> = Result<T, CredentialError>;
pub type SessionResult<T> = Result<T, SessionError>;
