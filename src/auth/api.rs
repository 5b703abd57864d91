//! Authentication API Endpoints
//! Mission: Register, login, refresh, and logout flows over the token issuer

use crate::auth::{
    jwt::JwtHandler,
    models::{
        Claims, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenKind,
        TokenPairResponse,
    },
    session_store::SessionStore,
    user_store::{is_duplicate_username, UserStore},
};
use crate::validation::{errors_body, validate_login, validate_register};
use anyhow::Context;
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(
        user_store: Arc<UserStore>,
        session_store: Arc<SessionStore>,
        jwt_handler: Arc<JwtHandler>,
    ) -> Self {
        Self {
            user_store,
            session_store,
            jwt_handler,
        }
    }
}

/// Registration endpoint - POST /signup
pub async fn register(
    State(state): State<AuthState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| AuthApiError::BadRequest(e.body_text()))?;

    let errors = validate_register(
        &payload.username,
        &payload.fullname,
        &payload.email,
        &payload.password,
    );
    if !errors.is_empty() {
        return Err(AuthApiError::Validation(errors));
    }

    info!("🔐 Registration attempt: {}", payload.username);

    state
        .user_store
        .create_user(
            &payload.username,
            &payload.fullname,
            &payload.email,
            &payload.password,
        )
        .map_err(|e| {
            if is_duplicate_username(&e) {
                AuthApiError::UsernameTaken
            } else {
                AuthApiError::Internal(e)
            }
        })?;

    Ok(Json(MessageResponse::new("success")))
}

/// Login endpoint - POST /signin
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| AuthApiError::BadRequest(e.body_text()))?;

    let errors = validate_login(&payload.username, &payload.password);
    if !errors.is_empty() {
        return Err(AuthApiError::Validation(errors));
    }

    info!("🔐 Login attempt: {}", payload.username);

    // Verify credentials
    let user = state
        .user_store
        .get_user_by_username(&payload.username)?
        .ok_or(AuthApiError::UnknownUser)?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash)
        .context("Failed to verify password")?;
    if !valid {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(AuthApiError::WrongPassword);
    }

    let pair = issue_pair(&state, &user.id, &user.username)?;

    info!("✅ Login successful: {}", user.username);

    Ok(Json(pair))
}

/// Refresh endpoint - POST /refresh
/// Exchanges a live refresh token for a fresh pair.
pub async fn refresh(
    State(state): State<AuthState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| AuthApiError::BadRequest(e.body_text()))?;

    // Any verification failure surfaces the verifier's message
    let claims = state
        .jwt_handler
        .verify(&payload.refresh_token)
        .map_err(|e| AuthApiError::TokenRejected(e.to_string()))?;

    // Access tokens cannot mint new pairs
    if !claims.is_refresh() {
        return Err(AuthApiError::NotRefreshToken);
    }

    let pair = issue_pair(&state, &claims.user_id, &claims.username)?;

    info!("🔄 Refreshed tokens for {}", claims.username);

    Ok(Json(pair))
}

/// Logout endpoint - POST /v1/signout (behind the gate)
pub async fn logout(
    State(state): State<AuthState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>, AuthApiError> {
    state.session_store.delete_session(&claims.username)?;

    info!("👋 Logged out: {}", claims.username);

    Ok(Json(MessageResponse::new("Logout successfully")))
}

/// Issue a fresh token pair and replace the stored session row.
/// One session per username: the previous row is removed first.
fn issue_pair(
    state: &AuthState,
    user_id: &str,
    username: &str,
) -> Result<TokenPairResponse, AuthApiError> {
    let access = state.jwt_handler.issue(user_id, username, TokenKind::Access)?;
    let refresh = state
        .jwt_handler
        .issue(user_id, username, TokenKind::Refresh)?;

    state.session_store.delete_session(username)?;
    state
        .session_store
        .create_session(username, &refresh.token, refresh.expires_at)?;

    Ok(TokenPairResponse {
        username: username.to_string(),
        access_token: access.token,
        refresh_token: refresh.token,
        expires: access.expires_at.timestamp(),
    })
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    /// Request body failed to decode
    BadRequest(String),
    /// Field validation failures, reported together
    Validation(Vec<String>),
    /// Username lookup came back empty
    UnknownUser,
    /// Password did not match the stored hash
    WrongPassword,
    /// Registration hit the username UNIQUE constraint
    UsernameTaken,
    /// Refresh token failed verification; carries the verifier's message
    TokenRejected(String),
    /// An access token was presented to the refresh endpoint
    NotRefreshToken,
    /// Storage or signing failure
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AuthApiError {
    fn from(err: anyhow::Error) -> Self {
        AuthApiError::Internal(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AuthApiError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, errors_body(&messages))
            }
            AuthApiError::UnknownUser => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Username or password is incorrect" }),
            ),
            AuthApiError::WrongPassword => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Your password is incorrect" }),
            ),
            AuthApiError::UsernameTaken => (
                StatusCode::CONFLICT,
                json!({ "error": "Username already used!" }),
            ),
            AuthApiError::TokenRejected(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            AuthApiError::NotRefreshToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Not Authorized" }),
            ),
            AuthApiError::Internal(err) => {
                error!("Auth storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
