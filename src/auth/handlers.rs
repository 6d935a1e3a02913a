use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginData, LoginRequest, RegisterRequest},
        jwt::AuthUser,
        password::{hash_password_blocking, verify_password_blocking},
        repo::StoreError,
    },
    error::ApiError,
    response::Envelope,
    state::AppState,
};

pub const REGISTERED: &str = "registered";
pub const USERNAME_EXISTS: &str = "username exists";
pub const USER_NOT_FOUND: &str = "user not found";
pub const WRONG_PASSWORD: &str = "wrong password";
pub const LOGGED_OUT: &str = "logged out";
pub const CREDENTIALS_REQUIRED: &str = "username and password are required";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

fn require_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation(CREDENTIALS_REQUIRED.into()));
    }
    Ok(())
}

fn malformed_body(e: JsonRejection) -> ApiError {
    warn!(error = %e, "malformed request body");
    ApiError::Validation(CREDENTIALS_REQUIRED.into())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Envelope, ApiError> {
    let Json(payload) = payload.map_err(malformed_body)?;
    require_credentials(&payload.username, &payload.password)?;

    // Fast path; the unique constraint still decides under concurrent registration.
    let existing = state
        .users
        .find_by_username(&payload.username)
        .await
        .context("find_by_username")?;
    if existing.is_some() {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::Validation(USERNAME_EXISTS.into()));
    }

    let hash = hash_password_blocking(payload.password).await?;

    let user = match state.users.insert(&payload.username, &hash).await {
        Ok(u) => u,
        Err(StoreError::UniqueViolation) => {
            warn!(username = %payload.username, "username taken by concurrent registration");
            return Err(ApiError::Validation(USERNAME_EXISTS.into()));
        }
        Err(e) => return Err(anyhow::Error::from(e).context("insert user").into()),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Envelope::message(REGISTERED))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Envelope<LoginData>, ApiError> {
    let Json(payload) = payload.map_err(malformed_body)?;
    require_credentials(&payload.username, &payload.password)?;

    let user = match state.users.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Auth(USER_NOT_FOUND.into()));
        }
        Err(e) => return Err(anyhow::Error::from(e).context("find_by_username").into()),
    };

    if !verify_password_blocking(payload.password, user.password.clone()).await? {
        warn!(user_id = user.id, "login wrong password");
        return Err(ApiError::Auth(WRONG_PASSWORD.into()));
    }

    let token = state.jwt.issue(user.id).context("jwt sign")?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Envelope::ok(LoginData {
        token,
        username: user.username,
    }))
}

/// Tokens are stateless, so there is nothing to revoke; the client drops its copy.
#[instrument]
pub async fn logout(user: Option<AuthUser>) -> Envelope {
    match user {
        Some(AuthUser(user_id)) => info!(user_id, "user logged out"),
        None => info!("anonymous logout"),
    }
    Envelope::message(LOGGED_OUT)
}
