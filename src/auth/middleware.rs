//! Authorization Gate
//! Mission: Protect API endpoints behind access-token verification

use crate::auth::jwt::JwtHandler;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Gate middleware: only requests carrying a live access token pass.
/// Verified claims are stored in request extensions for the handlers.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if bearer.is_empty() {
        return Err(AuthError::MissingToken);
    }

    // Token is the second field of "Bearer <token>"
    let token = bearer.split_whitespace().nth(1).unwrap_or("");

    let claims = jwt_handler
        .verify(token)
        .map_err(|e| AuthError::VerificationFailed(e.to_string()))?;

    // Refresh tokens only work against the refresh endpoint
    if claims.is_refresh() {
        return Err(AuthError::RefreshTokenUsed);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Gate error types
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent or empty
    MissingToken,
    /// Token failed verification; carries the verifier's message
    VerificationFailed(String),
    /// A refresh token was presented where an access token is required
    RefreshTokenUsed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken | AuthError::RefreshTokenUsed => "Not Authorized!".to_string(),
            AuthError::VerificationFailed(msg) => msg,
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}
