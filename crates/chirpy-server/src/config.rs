use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chirpy_crypto::{SigningSecret, DEFAULT_ISSUER};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable holding the token signing secret.
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_BIND_ADDR: &str = "CHIRPY_BIND_ADDR";
pub const ENV_DATABASE_PATH: &str = "CHIRPY_DATABASE_PATH";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Snapshot file backing the store.
    pub database_path: PathBuf,
    /// Token signing secret. Usually supplied via `JWT_SECRET` rather than
    /// written into the config file.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub token_issuer: String,
    /// Whether `POST /api/chirps` needs a bearer token.
    pub require_auth_for_chirps: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: PathBuf::from("database.json"),
            jwt_secret: None,
            token_issuer: DEFAULT_ISSUER.to_string(),
            require_auth_for_chirps: false,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`. The secret from the environment only
    /// fills in when the file did not set one.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if self.jwt_secret.is_none() {
            self.jwt_secret = lookup(ENV_JWT_SECRET);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr
                .parse()
                .map_err(|_| ServerError::Config(format!("{ENV_BIND_ADDR}: invalid address {addr:?}")))?;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// The signing secret, which must be present and non-empty.
    pub fn signing_secret(&self) -> ServerResult<SigningSecret> {
        let raw = self.jwt_secret.as_deref().ok_or_else(|| {
            ServerError::Config(format!("no signing secret: set {ENV_JWT_SECRET} or jwt_secret"))
        })?;
        SigningSecret::new(raw).map_err(|e| ServerError::Config(e.to_string()))
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_issuer", &self.token_issuer)
            .field("require_auth_for_chirps", &self.require_auth_for_chirps)
            .finish()
    }
}
