//! Confirmation Token Generation and Validation
//!
//! Tokens are HS512-signed JWTs carrying the user id and an expiry. The
//! signing key is the process-wide secret from [`crate::config::Config`].
//! Verification never touches the database; expired and forged tokens are
//! distinguished so callers can report them differently.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// Claims carried by a confirmation token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmationClaims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// Issue a signed confirmation token for `user_id`, valid for `ttl_seconds`.
pub fn issue(user_id: Uuid, secret: &str, ttl_seconds: i64) -> AuthResult<String> {
    let now = Utc::now();
    let claims = ConfirmationClaims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a confirmation token and return the embedded user id.
///
/// Fails with [`AuthError::TokenExpired`] when the expiry has passed and
/// [`AuthError::InvalidToken`] when the token is malformed or its signature
/// does not match.
pub fn verify(token: &str, secret: &str) -> AuthResult<Uuid> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.validate_exp = true;
    validation.leeway = 0;

    let data = decode::<ConfirmationClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    data.claims.sub.parse().map_err(|_| AuthError::InvalidToken)
}
