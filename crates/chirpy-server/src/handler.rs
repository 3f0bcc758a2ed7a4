use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use chirpy_service::{Chirp, ChirpId, LoginSession, User};
use serde::Deserialize;

use crate::auth::Credentials;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
    /// Requested token lifetime. Missing, zero or negative means the maximum.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChirpBody {
    pub body: String,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsBody>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let body = json_body(payload)?;
    let user = state
        .run(move |chirpy| chirpy.accounts().register(&body.email, &body.password))
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> ServerResult<Json<LoginSession>> {
    let body = json_body(payload)?;
    let ttl = body.expires_in_seconds.and_then(|secs| u64::try_from(secs).ok());
    let session = state
        .run(move |chirpy| chirpy.accounts().login(&body.email, &body.password, ttl))
        .await?;
    Ok(Json(session))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    credentials: Credentials,
    payload: Result<Json<CredentialsBody>, JsonRejection>,
) -> ServerResult<Json<User>> {
    let token = credentials.bearer()?.to_string();
    let body = json_body(payload)?;
    let user = state
        .run(move |chirpy| {
            chirpy
                .accounts()
                .update_profile(&token, &body.email, &body.password)
        })
        .await?;
    Ok(Json(user))
}

/// `Authorization` is only read when the server requires authenticated
/// posting; otherwise any header is ignored.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChirpBody>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Chirp>)> {
    if state.require_auth_for_chirps {
        let credentials = Credentials::from_headers(&headers)?;
        state.chirpy.accounts().authenticate(credentials.bearer()?)?;
    }
    let body = json_body(payload)?;
    let chirp = state
        .run(move |chirpy| chirpy.posts().submit(&body.body))
        .await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

pub async fn list_chirps_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<Chirp>>> {
    let chirps = state.run(|chirpy| chirpy.posts().list()).await?;
    Ok(Json(chirps))
}

pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ServerResult<Json<Chirp>> {
    let id: ChirpId = raw_id
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid chirp id: {raw_id:?}")))?;
    let chirp = state.run(move |chirpy| chirpy.posts().get(id)).await?;
    Ok(Json(chirp))
}
