use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chirpy_service::ServiceError;

use crate::error::ServerError;

/// Credentials presented with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Parse the `Authorization` header.
    ///
    /// No header means [`Credentials::Anonymous`]. Anything other than
    /// `Bearer <token>` (scheme matched case-insensitively) is rejected.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServerError> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(Self::Anonymous);
        };
        let value = value.to_str().map_err(|_| unauthorized())?;
        let (scheme, token) = value.trim().split_once(' ').ok_or_else(unauthorized)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(unauthorized());
        }
        Ok(Self::Bearer(token.to_string()))
    }

    /// The bearer token, or `Unauthorized` for anonymous requests.
    pub fn bearer(&self) -> Result<&str, ServerError> {
        match self {
            Self::Bearer(token) => Ok(token.as_str()),
            Self::Anonymous => Err(unauthorized()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}

fn unauthorized() -> ServerError {
    ServerError::Service(ServiceError::Unauthorized)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Credentials {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}
