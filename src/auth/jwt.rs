//! JWT Token Handler
//! Mission: Issue and verify access/refresh token pairs securely

use crate::auth::models::{Claims, SignedToken, TokenKind};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use tracing::debug;

/// Issuer claim embedded in every token
const ISSUER: &str = "bazaar-api";

/// Why a token was rejected. Display surfaces the decoder's own message,
/// which is what callers put in the 401 body.
#[derive(Debug)]
pub enum TokenError {
    /// Not parseable as a JWT at all (structure, base64, claim shape)
    Malformed(jsonwebtoken::errors::Error),
    /// Well-formed but the signature does not match the secret
    InvalidSignature(jsonwebtoken::errors::Error),
    /// Signed with an algorithm other than HS256
    WrongAlgorithm(jsonwebtoken::errors::Error),
    /// Signature fine, expiry in the past
    Expired(jsonwebtoken::errors::Error),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(e)
            | TokenError::InvalidSignature(e)
            | TokenError::WrongAlgorithm(e)
            | TokenError::Expired(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenError::Malformed(e)
            | TokenError::InvalidSignature(e)
            | TokenError::WrongAlgorithm(e)
            | TokenError::Expired(e) => Some(e),
        }
    }
}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Sign a token of the given kind for a user
    pub fn issue(&self, user_id: &str, username: &str, kind: TokenKind) -> Result<SignedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(kind.lifetime())
            .context("Invalid timestamp")?;

        let claims = Claims {
            sub: kind.subject().to_string(),
            iss: ISSUER.to_string(),
            exp: expires_at.timestamp() as usize,
            username: username.to_string(),
            user_id: user_id.to_string(),
        };

        debug!(
            "Issuing {} for user {} ({}), expires at {}",
            kind.subject(),
            username,
            user_id,
            expires_at
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign JWT")?;

        Ok(SignedToken { token, expires_at })
    }

    /// Verify a token and extract claims. HS256 is pinned; anything else
    /// is rejected before signature checking.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired(e),
            ErrorKind::InvalidSignature => TokenError::InvalidSignature(e),
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::WrongAlgorithm(e)
            }
            _ => TokenError::Malformed(e),
        })?;

        debug!(
            "Verified {} for user {}",
            decoded.claims.sub, decoded.claims.username
        );

        Ok(decoded.claims)
    }
}
