use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chirpy_types::PasswordHash;

use crate::error::{CredentialError, CredentialResult};

/// One-way password hashing with Argon2id.
///
/// Each call to [`hash`](Self::hash) draws a fresh random salt, so hashing
/// the same plaintext twice yields two different encodings. Verification
/// reads the algorithm, cost and salt back out of the stored PHC string, so
/// hashes produced under a different cost still verify.
#[derive(Clone)]
pub struct CredentialManager {
    argon2: Argon2<'static>,
}

impl CredentialManager {
    /// Argon2id with the library's default (memory-hard) cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with explicit cost parameters: memory in KiB, iterations,
    /// and lanes.
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> CredentialResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| CredentialError::InvalidCost(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a PHC-format string.
    pub fn hash(&self, plaintext: &str) -> CredentialResult<PasswordHash> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(PasswordHash::from_encoded(encoded.to_string()))
    }

    /// Returns `true` only if `plaintext` produced `hash`.
    ///
    /// A stored hash that cannot be parsed never verifies.
    pub fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        let parsed = match password_hash::PasswordHash::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("CredentialManager")
            .field("m_cost", &params.m_cost())
            .field("t_cost", &params.t_cost())
            .field("p_cost", &params.p_cost())
            .finish()
    }
}
