use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Tiered release type of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum ReleaseKind {
    Single = 1,
    Ep = 2,
    Album = 3,
}

impl ReleaseKind {
    /// Human-readable label used in JSON summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Ep => "EP",
            Self::Album => "Album",
        }
    }
}

/// Composition record from database.
///
/// `slug` is `None` between the initial insert and [`super::assign_slug`]:
/// the slug embeds the database-assigned id, so it can only be computed on a
/// second write. `description_html` is derived from `description` and only
/// ever written by the sanitizer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Composition {
    pub id: i64,
    pub artist_id: Uuid,
    pub release_type: ReleaseKind,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a composition.
#[derive(Debug, Deserialize, Validate)]
pub struct NewComposition {
    pub release_type: ReleaseKind,
    #[validate(length(min = 1, max = 64))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
}

/// Partial edit of a composition. `None` fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct CompositionUpdate {
    pub release_type: Option<ReleaseKind>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Externally observable composition summary.
///
/// Field names are part of the wire contract with API clients.
#[derive(Debug, Serialize)]
pub struct CompositionSummary {
    pub url: String,
    pub release_type: &'static str,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub timestamp: DateTime<Utc>,
    pub artist_url: String,
}

/// Error types for composition operations.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Composition not found")]
    NotFound,

    #[error("Slug already taken")]
    SlugConflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
