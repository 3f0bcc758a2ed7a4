//! HTTP server for Chirpy.
//!
//! A JSON API over the service layer: account registration and login,
//! profile updates behind a bearer token, and chirp submission and
//! retrieval. An admin page reports how many API requests were served.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod router;
pub mod server;
pub mod state;

pub use auth::Credentials;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::ChirpyServer;
pub use state::{AppState, HitCounter};
