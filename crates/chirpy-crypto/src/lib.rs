//! Credential and session primitives for Chirpy.
//!
//! Provides salted Argon2id password hashing and HS256-signed, expiring
//! session tokens. All crypto operations wrap established libraries; there is no
//! custom cryptography.

pub mod error;
pub mod password;
pub mod session;

pub use error::{CredentialError, CredentialResult, SessionError, SessionResult};
pub use password::CredentialManager;
pub use session::{
    clamp_ttl, SessionClaims, SessionIssuer, SigningSecret, DEFAULT_ISSUER, MAX_TOKEN_TTL_SECS,
};
