//! Composition persistence, editing, and the timeline query.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::permissions::Permission;
use crate::users::User;

use super::sanitize::sanitize_description;
use super::slug::slug_for;
use super::types::{
    Composition, CompositionError, CompositionSummary, CompositionUpdate, NewComposition,
};

/// Create a composition owned by `artist_id`.
///
/// The row is inserted without a slug; call [`assign_slug`] once the
/// database-assigned id is known. The description is sanitized immediately.
/// Callers gate this behind `Permission::PUBLISH`.
pub async fn create_composition(
    pool: &PgPool,
    artist_id: Uuid,
    new: &NewComposition,
) -> Result<Composition, CompositionError> {
    new.validate()
        .map_err(|e| CompositionError::Validation(e.to_string()))?;

    let description_html = sanitize_description(&new.description);

    let composition = sqlx::query_as::<_, Composition>(
        r"INSERT INTO compositions (artist_id, release_type, title, description, description_html)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING *",
    )
    .bind(artist_id)
    .bind(new.release_type)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&description_html)
    .fetch_one(pool)
    .await?;

    tracing::info!(composition_id = composition.id, artist_id = %artist_id, "Composition created");
    Ok(composition)
}

/// Compute and persist the slug for a composition that already has an id.
///
/// Runs as a second write after the initial insert. The unique index rejects
/// the (practically impossible) case of two rows racing to the same slug.
pub async fn assign_slug(
    pool: &PgPool,
    composition: &mut Composition,
) -> Result<(), CompositionError> {
    let slug = slug_for(composition.id, &composition.title);
    persist_slug(pool, composition.id, &slug).await?;
    composition.slug = Some(slug);
    Ok(())
}

async fn persist_slug<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    id: i64,
    slug: &str,
) -> Result<(), CompositionError> {
    sqlx::query("UPDATE compositions SET slug = $2 WHERE id = $1")
        .bind(id)
        .bind(slug)
        .execute(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                CompositionError::SlugConflict
            }
            other => CompositionError::Database(other),
        })?;
    Ok(())
}

/// Replace the raw description, recomputing the sanitized form.
///
/// The derived HTML field is only ever written here and in
/// [`create_composition`]/[`update_composition`], so it can never drift from
/// the raw text.
pub async fn set_description(
    pool: &PgPool,
    composition: &mut Composition,
    raw: &str,
) -> Result<(), CompositionError> {
    let description_html = sanitize_description(raw);

    sqlx::query("UPDATE compositions SET description = $2, description_html = $3 WHERE id = $1")
        .bind(composition.id)
        .bind(raw)
        .bind(&description_html)
        .execute(pool)
        .await?;

    composition.description = raw.to_string();
    composition.description_html = description_html;
    Ok(())
}

/// Apply a partial edit on behalf of `editor`.
///
/// Permitted only for the owning artist or a holder of `Permission::ADMIN`.
/// A title change reassigns the slug; a description change re-sanitizes.
/// The post-edit state obeys the same constraints as creation. The field
/// update and the slug rewrite share one transaction, and `composition` is
/// only mutated after commit, so a failed edit leaves both the row and the
/// caller's struct exactly as they were.
pub async fn update_composition(
    pool: &PgPool,
    editor: &User,
    composition: &mut Composition,
    update: &CompositionUpdate,
) -> Result<(), CompositionError> {
    if editor.id != composition.artist_id && !editor.can(pool, Permission::ADMIN).await? {
        return Err(CompositionError::Forbidden);
    }

    let candidate = NewComposition {
        release_type: update.release_type.unwrap_or(composition.release_type),
        title: update.title.clone().unwrap_or_else(|| composition.title.clone()),
        description: update
            .description
            .clone()
            .unwrap_or_else(|| composition.description.clone()),
    };
    candidate
        .validate()
        .map_err(|e| CompositionError::Validation(e.to_string()))?;
    let NewComposition { release_type, title, description } = candidate;

    let title_changed = title != composition.title;
    let description_html = if description != composition.description {
        sanitize_description(&description)
    } else {
        composition.description_html.clone()
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"UPDATE compositions
           SET release_type = $2, title = $3, description = $4, description_html = $5
           WHERE id = $1",
    )
    .bind(composition.id)
    .bind(release_type)
    .bind(&title)
    .bind(&description)
    .bind(&description_html)
    .execute(&mut *tx)
    .await?;

    let slug = if title_changed {
        let slug = slug_for(composition.id, &title);
        persist_slug(&mut *tx, composition.id, &slug).await?;
        Some(slug)
    } else {
        None
    };

    tx.commit().await?;

    composition.release_type = release_type;
    composition.title = title;
    composition.description = description;
    composition.description_html = description_html;
    if slug.is_some() {
        composition.slug = slug;
    }
    Ok(())
}

/// Fetch a composition by id. Absence is `None`, not an error.
pub async fn find_by_id(pool: &PgPool, id: i64) -> sqlx::Result<Option<Composition>> {
    sqlx::query_as::<_, Composition>("SELECT * FROM compositions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetch a composition by slug.
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> sqlx::Result<Option<Composition>> {
    sqlx::query_as::<_, Composition>("SELECT * FROM compositions WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Page through a single artist's compositions, newest first.
pub async fn compositions_by_artist(
    pool: &PgPool,
    artist_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Composition>> {
    sqlx::query_as::<_, Composition>(
        r"SELECT * FROM compositions
           WHERE artist_id = $1
           ORDER BY created_at DESC, id DESC
           LIMIT $2 OFFSET $3",
    )
    .bind(artist_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// The personalized timeline: compositions by every user `user_id` follows,
/// including their own via the mandatory self-edge, newest first.
///
/// A single join against the follow graph, not one query per followed user.
pub async fn timeline_for(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Composition>> {
    sqlx::query_as::<_, Composition>(
        r"SELECT c.*
           FROM compositions c
           JOIN follows f ON f.followed_id = c.artist_id
           WHERE f.follower_id = $1
           ORDER BY c.created_at DESC, c.id DESC
           LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Build the externally observable summary for a composition.
pub fn summary(composition: &Composition, api_base: &str) -> CompositionSummary {
    CompositionSummary {
        url: format!("{api_base}/compositions/{}", composition.id),
        release_type: composition.release_type.label(),
        title: composition.title.clone(),
        description: composition.description.clone(),
        description_html: composition.description_html.clone(),
        timestamp: composition.created_at,
        artist_url: format!("{api_base}/users/{}", composition.artist_id),
    }
}
