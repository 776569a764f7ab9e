//! Authentication Error Types

use thiserror::Error;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Malformed token or signature mismatch.
    #[error("Invalid token")]
    InvalidToken,

    /// Token subject does not match the redeeming user.
    #[error("Token subject mismatch")]
    SubjectMismatch,

    /// Password hashing error.
    #[error("Password processing failed")]
    PasswordHash,

    /// JWT error on the issue path.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
