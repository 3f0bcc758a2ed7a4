//! Service layer for Chirpy.
//!
//! Composes the store, credential manager and session issuer into the
//! operations an HTTP front end calls. [`Chirpy`] bundles them into the one
//! context object a process builds at startup.

pub mod accounts;
pub mod error;
pub mod filter;
pub mod posts;

use std::sync::Arc;

use chirpy_crypto::{CredentialManager, SessionIssuer};
use chirpy_store::Store;

pub use accounts::{AccountService, LoginSession};
pub use error::{ServiceError, ServiceResult};
pub use filter::{ProfanityFilter, TextFilter};
pub use posts::PostService;

// Re-export key types
pub use chirpy_crypto::{clamp_ttl, SigningSecret, MAX_TOKEN_TTL_SECS};
pub use chirpy_types::{Chirp, ChirpId, User, UserId, MAX_CHIRP_LEN};

/// All Chirpy services, sharing one store.
#[derive(Clone)]
pub struct Chirpy {
    accounts: Arc<AccountService>,
    posts: Arc<PostService>,
    store: Arc<dyn Store>,
}

impl Chirpy {
    pub fn new(
        store: Arc<dyn Store>,
        credentials: CredentialManager,
        sessions: SessionIssuer,
        filter: Arc<dyn TextFilter>,
    ) -> Self {
        let sessions = Arc::new(sessions);
        Self {
            accounts: Arc::new(AccountService::new(store.clone(), credentials, sessions)),
            posts: Arc::new(PostService::new(store.clone(), filter)),
            store,
        }
    }

    /// Default credential cost, system clock, and the stock profanity filter.
    pub fn with_defaults(store: Arc<dyn Store>, secret: &SigningSecret) -> Self {
        Self::new(
            store,
            CredentialManager::new(),
            SessionIssuer::new(secret),
            Arc::new(ProfanityFilter::default()),
        )
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for Chirpy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chirpy").finish_non_exhaustive()
    }
}
