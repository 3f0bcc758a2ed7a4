use std::sync::Arc;

use chirpy_crypto::{CredentialManager, SessionIssuer};
use chirpy_service::{Chirpy, ProfanityFilter};
use chirpy_store::FileStore;
use chirpy_types::SystemClock;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Chirpy HTTP server.
pub struct ChirpyServer {
    config: ServerConfig,
    state: AppState,
}

impl ChirpyServer {
    /// Open the store named in `config` and wire up all services.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let secret = config.signing_secret()?;
        let store = Arc::new(FileStore::open(&config.database_path)?);
        let sessions =
            SessionIssuer::with_clock(&secret, config.token_issuer.clone(), Arc::new(SystemClock));
        let chirpy = Chirpy::new(
            store,
            CredentialManager::new(),
            sessions,
            Arc::new(ProfanityFilter::default()),
        );
        let state = AppState::new(chirpy).require_auth_for_chirps(config.require_auth_for_chirps);
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            database = %self.config.database_path.display(),
            "chirpy server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
