//! User persistence and the registration factory.

use md5::{Digest, Md5};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, AuthError};
use crate::permissions::Permission;

use super::error::UserError;
use super::model::{NewUser, User, UserSummary};

/// Create a user.
///
/// Validates the payload, hashes the password, assigns the registry default
/// role when none is supplied, and inserts the mandatory self-follow edge,
/// all inside one transaction so a user can never exist without its
/// self-edge. Duplicate usernames or emails surface as
/// [`UserError::AlreadyExists`]; the unique indexes are the backstop for
/// concurrent registrations.
pub async fn create_user(pool: &PgPool, new: &NewUser) -> Result<User, UserError> {
    new.validate()
        .map_err(|e| UserError::Validation(e.to_string()))?;

    let password_hash = auth::hash_password(&new.password)?;

    let mut tx = pool.begin().await?;

    let role_id = match new.role_id {
        Some(role_id) => role_id,
        None => sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE is_default")
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(UserError::DefaultRoleMissing)?,
    };

    let avatar_hash = format!("{:x}", Md5::digest(new.email.to_lowercase().as_bytes()));

    let user = sqlx::query_as::<_, User>(
        r"INSERT INTO users (id, username, email, password_hash, role_id, display_name, location, bio, avatar_hash)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
           RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&new.username)
    .bind(&new.email)
    .bind(&password_hash)
    .bind(role_id)
    .bind(&new.display_name)
    .bind(&new.location)
    .bind(&new.bio)
    .bind(&avatar_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            UserError::AlreadyExists
        }
        other => UserError::Database(other),
    })?;

    // Every user follows itself so the timeline join sees its own work.
    sqlx::query("INSERT INTO follows (follower_id, followed_id) VALUES ($1, $1)")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok(user)
}

/// Fetch a user by id.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetch a user by username.
pub async fn find_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Fetch a user by email, compared case-insensitively.
pub async fn find_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Fetch the permission mask of a role, if the role exists.
pub async fn role_permissions(pool: &PgPool, role_id: Uuid) -> sqlx::Result<Option<Permission>> {
    let mask: Option<i64> = sqlx::query_scalar("SELECT permissions FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(pool)
        .await?;
    Ok(mask.map(Permission::from_db))
}

/// Rehash and persist a new password for `user`.
pub async fn change_password(
    pool: &PgPool,
    user: &mut User,
    plaintext: &str,
) -> Result<(), UserError> {
    user.set_password(plaintext)?;
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(user.id)
        .bind(&user.password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Redeem a confirmation token for `user`.
///
/// The token subject must be this user: a valid, unexpired token for someone
/// else is rejected so a confirmation link cannot confirm a different
/// logged-in session.
pub async fn confirm(
    pool: &PgPool,
    user: &mut User,
    token: &str,
    secret: &str,
) -> Result<(), UserError> {
    let subject = auth::tokens::verify(token, secret)?;
    if subject != user.id {
        return Err(UserError::Auth(AuthError::SubjectMismatch));
    }

    sqlx::query("UPDATE users SET confirmed = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await?;
    user.confirmed = true;
    Ok(())
}

/// Build the externally observable summary for `user`.
pub async fn summary(pool: &PgPool, user: &User, api_base: &str) -> sqlx::Result<UserSummary> {
    let composition_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM compositions WHERE artist_id = $1")
            .bind(user.id)
            .fetch_one(pool)
            .await?;

    Ok(UserSummary {
        url: format!("{api_base}/users/{}", user.id),
        username: user.username.clone(),
        last_seen: user.last_seen,
        compositions_url: format!("{api_base}/users/{}/compositions/", user.id),
        followed_compositions_url: format!("{api_base}/users/{}/timeline/", user.id),
        composition_count,
    })
}
