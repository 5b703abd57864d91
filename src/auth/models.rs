//! Authentication Models
//! Mission: Define user, session, and token data structures

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: DateTime<Utc>,
}

/// Stored refresh-token row, at most one per username
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// The two token families the issuer hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Subject claim embedded in tokens of this kind
    pub fn subject(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }

    pub fn lifetime(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::minutes(15),
            TokenKind::Refresh => Duration::minutes(30),
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // token kind subject
    pub iss: String,
    pub exp: usize, // expiration timestamp
    pub username: String,
    pub user_id: String,
}

impl Claims {
    pub fn is_refresh(&self) -> bool {
        self.sub == TokenKind::Refresh.subject()
    }
}

/// An encoded token together with its expiry
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Registration request body. Missing keys decode as empty strings and
/// are caught by validation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Token pair handed out by login and refresh
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires: i64, // unix seconds when the access token expires
}

/// Plain {"message": ...} body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
