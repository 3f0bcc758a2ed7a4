use std::sync::Arc;

use chirpy_crypto::{CredentialManager, SessionIssuer};
use chirpy_store::Store;
use chirpy_types::{PasswordHash, User, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};

/// A successful login: the user view plus a bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

/// Plaintext behind the hash checked when a login names an unknown email.
const DUMMY_PASSWORD: &str = "chirpy-unknown-account";

/// Registration, login and profile updates.
pub struct AccountService {
    store: Arc<dyn Store>,
    credentials: CredentialManager,
    sessions: Arc<SessionIssuer>,
    /// Stands in for the stored hash when a login names an unknown email.
    dummy_hash: Option<PasswordHash>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Store>,
        credentials: CredentialManager,
        sessions: Arc<SessionIssuer>,
    ) -> Self {
        let dummy_hash = credentials
            .hash(DUMMY_PASSWORD)
            .map_err(|e| warn!(error = %e, "could not prepare dummy password hash"))
            .ok();
        Self {
            store,
            credentials,
            sessions,
            dummy_hash,
        }
    }

    /// Create an account. Fails with `AlreadyExists` if the email is taken.
    pub fn register(&self, email: &str, password: &str) -> ServiceResult<User> {
        require_fields(email, password)?;
        if self.store.user_exists(email)? {
            return Err(ServiceError::AlreadyExists);
        }
        let hash = self.credentials.hash(password)?;
        // The store re-checks uniqueness under its lock; a concurrent
        // registration for the same email loses there.
        Ok(self.store.create_user(email, hash)?)
    }

    /// Check credentials and issue a token valid for the clamped `ttl_secs`.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`, and both
    /// run a full password verification first.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        ttl_secs: Option<u64>,
    ) -> ServiceResult<LoginSession> {
        let record = match self.store.get_user_by_email(email) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                if let Some(dummy) = &self.dummy_hash {
                    self.credentials.verify(password, dummy);
                }
                warn!("login rejected: unknown email");
                return Err(ServiceError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };
        if !self.credentials.verify(password, &record.password_hash) {
            warn!(user = %record.id, "login rejected: wrong password");
            return Err(ServiceError::Unauthorized);
        }

        let token = self.sessions.issue(record.id, ttl_secs)?;
        info!(user = %record.id, "login succeeded");
        Ok(LoginSession {
            user: record.into(),
            token,
        })
    }

    /// Resolve a bearer token to the user it was issued to.
    pub fn authenticate(&self, token: &str) -> ServiceResult<UserId> {
        self.sessions.validate(token).map_err(|e| {
            warn!("token rejected");
            e.into()
        })
    }

    /// Replace email and password for the user named by `token`.
    pub fn update_profile(&self, token: &str, email: &str, password: &str) -> ServiceResult<User> {
        let id = self.authenticate(token)?;
        require_fields(email, password)?;
        let hash = self.credentials.hash(password)?;
        Ok(self.store.update_user(id, email, hash)?)
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("credentials", &self.credentials)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

fn require_fields(email: &str, password: &str) -> ServiceResult<()> {
    if email.is_empty() {
        return Err(ServiceError::Validation("email is required".into()));
    }
    if password.is_empty() {
        return Err(ServiceError::Validation("password is required".into()));
    }
    Ok(())
}
