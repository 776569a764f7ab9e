//! User model and credential methods.

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, AuthResult};
use crate::permissions::Permission;

use super::store;

/// User model.
///
/// `password_hash` is crate-private and skipped during serialization: the
/// plaintext password is never stored, and the hash is only reachable through
/// [`User::set_password`] and [`User::verify_password`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub(crate) password_hash: Option<String>,
    pub role_id: Uuid,
    pub confirmed: bool,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub avatar_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Replace the stored credential with a salted Argon2id hash of
    /// `plaintext`. The plaintext itself is never retained.
    pub fn set_password(&mut self, plaintext: &str) -> AuthResult<()> {
        self.password_hash = Some(auth::hash_password(plaintext)?);
        Ok(())
    }

    /// Check `plaintext` against the stored hash.
    ///
    /// Returns `false` on mismatch or when no credential is set.
    #[must_use]
    pub fn verify_password(&self, plaintext: &str) -> bool {
        self.password_hash
            .as_deref()
            .is_some_and(|hash| auth::verify_password(plaintext, hash))
    }

    /// MD5 fingerprint of the lowercased email, used for avatar URLs.
    #[must_use]
    pub fn email_hash(&self) -> String {
        let digest = Md5::digest(self.email.to_lowercase().as_bytes());
        format!("{digest:x}")
    }

    /// Avatar URL for this user at the given pixel size.
    #[must_use]
    pub fn avatar_url(&self, size: u32) -> String {
        let hash = self.avatar_hash.clone().unwrap_or_else(|| self.email_hash());
        format!("https://unicornify.pictures/avatar/{hash}?s={size}")
    }

    /// Check whether this user's role grants `permission`.
    ///
    /// Returns `false` when the role row is missing.
    pub async fn can(&self, pool: &PgPool, permission: Permission) -> sqlx::Result<bool> {
        let mask = store::role_permissions(pool, self.role_id).await?;
        Ok(mask.is_some_and(|m| m.has(permission)))
    }

    /// Sugar for `can(Permission::ADMIN)`.
    pub async fn is_administrator(&self, pool: &PgPool) -> sqlx::Result<bool> {
        self.can(pool, Permission::ADMIN).await
    }

    /// Update the last-activity timestamp to now and persist it.
    ///
    /// Called by the web layer on every authenticated request.
    pub async fn touch_activity(&mut self, pool: &PgPool) -> sqlx::Result<()> {
        let last_seen: DateTime<Utc> =
            sqlx::query_scalar("UPDATE users SET last_seen = NOW() WHERE id = $1 RETURNING last_seen")
                .bind(self.id)
                .fetch_one(pool)
                .await?;
        self.last_seen = last_seen;
        Ok(())
    }

    /// Issue a signed confirmation token bound to this user.
    ///
    /// The caller delivers it out-of-band (mail collaborator); redemption
    /// goes through [`store::confirm`].
    pub fn confirmation_token(&self, secret: &str, ttl_seconds: i64) -> AuthResult<String> {
        auth::tokens::issue(self.id, secret, ttl_seconds)
    }
}

/// Payload for user registration.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    /// Explicit role; when `None` the registry default is assigned.
    pub role_id: Option<Uuid>,
}

/// Externally observable user summary.
///
/// Field names are part of the wire contract with API clients.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub url: String,
    pub username: String,
    pub last_seen: DateTime<Utc>,
    pub compositions_url: String,
    pub followed_compositions_url: String,
    pub composition_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_user(email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: "john".into(),
            email: email.into(),
            password_hash: None,
            role_id: Uuid::now_v7(),
            confirmed: false,
            display_name: None,
            location: None,
            bio: None,
            last_seen: Utc::now(),
            avatar_hash: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_set_and_verify_password() {
        let mut user = bare_user("john@example.com");
        user.set_password("cat").unwrap();
        assert!(user.verify_password("cat"));
        assert!(!user.verify_password("dog"));
    }

    #[test]
    fn test_verify_password_without_credential_is_false() {
        let user = bare_user("john@example.com");
        assert!(!user.verify_password("anything"));
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let mut user = bare_user("john@example.com");
        user.set_password("cat").unwrap();
        assert!(!user.password_hash.as_deref().unwrap().contains("cat"));
    }

    #[test]
    fn test_identical_passwords_hash_differently() {
        let mut a = bare_user("a@example.com");
        let mut b = bare_user("b@example.com");
        a.set_password("same-password").unwrap();
        b.set_password("same-password").unwrap();
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut user = bare_user("john@example.com");
        user.set_password("cat").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_email_hash_is_md5_of_lowercased_email() {
        let user = bare_user("John@EXAMPLE.com");
        assert_eq!(user.email_hash(), "d4c74594d841139328695756648b6bd6");
    }

    #[test]
    fn test_avatar_url_prefers_stored_fingerprint() {
        let mut user = bare_user("john@example.com");
        user.avatar_hash = Some("deadbeef".into());
        assert_eq!(
            user.avatar_url(128),
            "https://unicornify.pictures/avatar/deadbeef?s=128"
        );
    }
}
