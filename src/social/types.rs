use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Follow edge record from database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Error types for follow-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cannot unfollow yourself")]
    SelfUnfollow,
}
