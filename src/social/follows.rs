//! Follow-graph operations.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::{Follow, SocialError};

/// Insert the directed edge `follower -> followed` with the current
/// timestamp.
///
/// Idempotent: following twice leaves exactly one edge. Concurrent calls for
/// the same pair race on the compound primary key and the loser's insert is
/// ignored, not errored.
pub async fn follow(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<(), SocialError> {
    sqlx::query(
        r"INSERT INTO follows (follower_id, followed_id)
           VALUES ($1, $2)
           ON CONFLICT (follower_id, followed_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove the directed edge `follower -> followed`. No-op when absent.
///
/// This is the raw delete, also used by administrative cascades. End-user
/// unfollow goes through [`unfollow_user`], which refuses to touch the
/// self-edge.
pub async fn unfollow(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<(), SocialError> {
    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Unfollow on behalf of an end user.
///
/// Rejects `follower == followed`: removing the self-edge would break the
/// timeline invariant.
pub async fn unfollow_user(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<(), SocialError> {
    if follower_id == followed_id {
        return Err(SocialError::SelfUnfollow);
    }
    unfollow(pool, follower_id, followed_id).await
}

/// Check whether the edge `follower -> followed` exists.
pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await
}

/// Check whether `other` follows `user_id`.
pub async fn is_followed_by(pool: &PgPool, user_id: Uuid, other_id: Uuid) -> sqlx::Result<bool> {
    is_following(pool, other_id, user_id).await
}

/// Page through the edges pointing at `user_id`.
///
/// Ordered by insertion time, then by follower id for ties, so the sequence
/// is stable and restartable across pages.
pub async fn followers(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Follow>> {
    sqlx::query_as::<_, Follow>(
        r"SELECT follower_id, followed_id, created_at
           FROM follows
           WHERE followed_id = $1
           ORDER BY created_at ASC, follower_id ASC
           LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Page through the edges leaving `user_id`.
pub async fn following(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Follow>> {
    sqlx::query_as::<_, Follow>(
        r"SELECT follower_id, followed_id, created_at
           FROM follows
           WHERE follower_id = $1
           ORDER BY created_at ASC, followed_id ASC
           LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Backfill the reflexive self-edge for every user that lacks one.
///
/// Idempotent: existing edges are left untouched. Returns the number of
/// edges created. Exists for datasets that predate the self-follow
/// invariant.
pub async fn ensure_self_follows(pool: &PgPool) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r"INSERT INTO follows (follower_id, followed_id)
           SELECT id, id FROM users
           ON CONFLICT (follower_id, followed_id) DO NOTHING",
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
