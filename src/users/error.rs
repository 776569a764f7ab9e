use thiserror::Error;

use crate::auth::AuthError;

/// Error types for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username or email already taken")]
    AlreadyExists,

    #[error("No default role has been seeded")]
    DefaultRoleMissing,

    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
