use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chirpy_service::ServiceError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("store error: {0}")]
    Store(#[from] chirpy_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ServerError {
    /// Status code and client-facing message. Internal detail never leaves
    /// the process.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Service(e) => match e {
                ServiceError::AlreadyExists => (StatusCode::CONFLICT, e.to_string()),
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                ServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
                ServiceError::TooLong { .. } | ServiceError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                ServiceError::Internal(_) => internal(),
            },
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => internal(),
        }
    }
}

fn internal() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong".into())
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
